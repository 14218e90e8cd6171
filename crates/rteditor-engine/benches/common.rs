// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use rteditor_engine::marks::CommentAttrs;
use rteditor_engine::{Mark, MarkKind, Node, NodeKind};

#[allow(dead_code)]
pub fn generate_section(index: usize) -> Vec<Node> {
    let comment = CommentAttrs::new(&format!("c{index}"), &format!("t{index}")).to_mark();
    vec![
        Node::heading(2, vec![Node::text(&format!("Section {index}"))]),
        Node::paragraph(vec![
            Node::text("Paragraph with "),
            Node::marked_text("bold", vec![Mark::new(MarkKind::Bold)]),
            Node::text(" and "),
            Node::marked_text("annotated *text*", vec![comment, Mark::new(MarkKind::Italic)]),
            Node::text(". 1. Not a list."),
        ]),
        Node::element(
            NodeKind::BulletList,
            (0..3)
                .map(|i| {
                    Node::element(
                        NodeKind::ListItem,
                        vec![Node::paragraph(vec![Node::text(&format!("Item {i}"))])],
                    )
                })
                .collect(),
        ),
        Node::element(
            NodeKind::CodeBlock,
            vec![Node::text("fn example() {\n    println!(\"Hello\");\n}")],
        )
        .with_attr("language", "rust"),
    ]
}

#[allow(dead_code)]
pub fn generate_document(sections: usize) -> Node {
    Node::doc((0..sections).flat_map(generate_section).collect())
}

#[allow(dead_code)]
pub fn generate_large_document() -> Node {
    generate_document(200)
}
