use display_tree::{DisplayTree, format_tree};
use webstrar_site::FileNode;

#[derive(DisplayTree)]
struct TreeView {
    #[node_label]
    label: String,
    #[tree]
    children: Vec<TreeView>,
}

impl From<&FileNode> for TreeView {
    fn from(node: &FileNode) -> Self {
        let label = if node.is_directory {
            format!("{}/", node.name)
        } else {
            format!("{} ({} B)", node.name, node.size)
        };
        Self {
            label,
            children: node.children.iter().map(TreeView::from).collect(),
        }
    }
}

/// Render `nodes` as a tree hanging off `root`.
pub fn render(root: &str, nodes: &[FileNode]) -> String {
    let tree = TreeView {
        label: root.to_string(),
        children: nodes.iter().map(TreeView::from).collect(),
    };
    format_tree!(tree)
}
