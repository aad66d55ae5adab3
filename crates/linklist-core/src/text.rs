// SPDX-License-Identifier: AGPL-3.0-or-later
//! Plain text rendering of fragments

use crate::model::{Fragment, Link, Record, TextBlock};

pub(crate) fn render_fragment(output: &mut String, fragment: &Fragment) {
    match fragment {
        Fragment::Text(content)
        | Fragment::Date(content)
        | Fragment::Color(content)
        | Fragment::Select(content) => output.push_str(content),
        Fragment::Number(n) => output.push_str(&n.to_string()),
        Fragment::StructuredText(blocks) => render_blocks(output, blocks),
        Fragment::Group(group) => {
            for (i, record) in group.records().iter().enumerate() {
                if i > 0 {
                    output.push('\n');
                }
                render_record(output, record);
            }
        }
        Fragment::Link(link) => render_link(output, link),
        Fragment::Other { value, .. } => render_value(output, value),
    }
}

// Scalars render as-is; objects and arrays have no plain text form
fn render_value(output: &mut String, value: &serde_json::Value) {
    match value {
        serde_json::Value::String(s) => output.push_str(s),
        serde_json::Value::Number(n) => output.push_str(&n.to_string()),
        serde_json::Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {}
    }
}

fn render_blocks(output: &mut String, blocks: &[TextBlock]) {
    let mut first = true;
    for text in blocks.iter().filter_map(TextBlock::text) {
        if !first {
            output.push('\n');
        }
        output.push_str(text);
        first = false;
    }
}

fn render_record(output: &mut String, record: &Record) {
    for (i, (_, fragment)) in record.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        render_fragment(output, fragment);
    }
}

fn render_link(output: &mut String, link: &Link) {
    match link {
        Link::Document(doc) => output.push_str(&doc.id),
        Link::Web(_) | Link::File(_) | Link::Image(_) => {
            output.push_str(link.url().unwrap_or_default())
        }
    }
}
