use tabled::Tabled;
use webstrar_site::PageSlot;

use super::{Context, format_time};
use crate::ui::table::Formatter;

#[derive(Debug, clap::Args)]
pub struct StatusArg {
    #[arg(long)]
    pub site: u32,
}

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Page")]
    page: String,
    #[tabled(rename = "Files")]
    files: usize,
    #[tabled(rename = "Last modified")]
    last_modified: String,
    #[tabled(rename = "Entry")]
    entry: String,
    #[tabled(rename = "Documents")]
    documents: String,
}

impl From<&PageSlot> for SlotRow {
    fn from(slot: &PageSlot) -> Self {
        Self {
            page: slot.name.clone(),
            files: slot.file_count,
            last_modified: format_time(slot.last_modified),
            entry: slot.entry_document.clone().unwrap_or_else(|| "-".to_string()),
            documents: slot.entry_candidates.join(", "),
        }
    }
}

impl StatusArg {
    pub fn run(self, ctx: &Context) -> anyhow::Result<()> {
        let statuses = ctx.browser().statuses(self.site);
        if ctx.json {
            return ctx.print_json(&statuses);
        }

        let deployed = statuses.iter().filter(|s| s.has_content).count();
        let table = Formatter::default()
            .header(format!("website{}", self.site))
            .footer(format!("{deployed} of {} pages deployed", statuses.len()))
            .build(statuses.iter().map(SlotRow::from));
        println!("{table}");
        Ok(())
    }
}
