use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Syntax tag for a viewed file, derived from its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    AspNet,
    CSharp,
    VbNet,
    JavaScript,
    Css,
    Json,
    Html,
    Xml,
    Sql,
    Markdown,
    PlainText,
}

impl Language {
    /// Look up a file name's extension, ignoring case. Unknown or missing
    /// extensions map to [`Language::PlainText`].
    pub fn classify(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "aspx" | "ascx" | "asax" | "master" | "cshtml" | "razor" => Self::AspNet,
            "cs" => Self::CSharp,
            "vb" => Self::VbNet,
            "js" | "mjs" | "ts" => Self::JavaScript,
            "css" | "scss" | "less" => Self::Css,
            "json" => Self::Json,
            "html" | "htm" => Self::Html,
            "xml" | "config" | "xsd" | "xslt" => Self::Xml,
            "sql" => Self::Sql,
            "md" | "markdown" => Self::Markdown,
            _ => Self::PlainText,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::AspNet => "aspnet",
            Self::CSharp => "csharp",
            Self::VbNet => "vbnet",
            Self::JavaScript => "javascript",
            Self::Css => "css",
            Self::Json => "json",
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Sql => "sql",
            Self::Markdown => "markdown",
            Self::PlainText => "plaintext",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(Language::classify("site.css"), Language::Css);
        assert_eq!(Language::classify("Default.aspx"), Language::AspNet);
        assert_eq!(Language::classify("Default.aspx.cs"), Language::CSharp);
        assert_eq!(Language::classify("web.config"), Language::Xml);
        assert_eq!(Language::classify("schema.sql"), Language::Sql);
        assert_eq!(Language::classify("README.md"), Language::Markdown);
        assert_eq!(Language::classify("data.json"), Language::Json);
        assert_eq!(Language::classify("app.js"), Language::JavaScript);
        assert_eq!(Language::classify("index.htm"), Language::Html);
    }

    #[test]
    fn classification_ignores_case_and_directories() {
        assert_eq!(Language::classify("CSS/SITE.CSS"), Language::Css);
        assert_eq!(Language::classify("pages/Index.HTML"), Language::Html);
    }

    #[test]
    fn unknown_and_missing_extensions_fall_back() {
        assert_eq!(Language::classify("Makefile"), Language::PlainText);
        assert_eq!(Language::classify("archive.bin"), Language::PlainText);
        assert_eq!(Language::classify(""), Language::PlainText);
        assert_eq!(Language::classify(".gitignore"), Language::PlainText);
    }

    #[test]
    fn tags_match_serialized_form() {
        assert_eq!(Language::Css.tag(), "css");
        assert_eq!(serde_json::to_string(&Language::JavaScript).unwrap(), "\"javascript\"");
        assert_eq!(serde_json::to_string(&Language::PlainText).unwrap(), "\"plaintext\"");
        assert_eq!(serde_json::to_string(&Language::AspNet).unwrap(), "\"aspnet\"");
    }
}
