//! Model document writer
//!
//! Renders the model tree as compact JSON with a fixed schema:
//!
//! ```text
//! ModelNode  {"name","mountPoint","mesh","children"}
//! Cuboid     {"start","end","uvMap"}
//! UvMap      {"offset","size"}
//! Position   {"x","y","z"}
//! Size       {"x","y","z"}
//! Position2d {"x","y"}
//! ```
//!
//! Every scalar is written with exactly [`DOCUMENT_PRECISION`] fractional
//! digits and no whitespace is emitted, so identical trees always produce
//! byte-identical documents.

use super::model::{Cuboid, ModelNode, Position, Position2d, Size, UvMap};

/// Number of fractional digits written for every scalar
pub const DOCUMENT_PRECISION: usize = 20;

/// Trait for values that render into the model document.
///
/// Implementors append themselves to `out` without any surrounding
/// whitespace. Use [`WriteJson::to_json`] for a standalone string.
pub trait WriteJson {
    /// Append this value to `out`.
    fn write_json(&self, out: &mut String);

    /// Render this value on its own.
    fn to_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }
}

/// Render a complete model document.
pub fn render_document(root: &ModelNode) -> String {
    root.to_json()
}

fn write_scalar(out: &mut String, value: f64) {
    out.push_str(&format!("{:.*}", DOCUMENT_PRECISION, value));
}

fn write_key(out: &mut String, key: &str) {
    out.push('"');
    out.push_str(key);
    out.push_str("\":");
}

fn write_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_array<T: WriteJson>(out: &mut String, items: &[T]) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        item.write_json(out);
    }
    out.push(']');
}

fn write_xyz(out: &mut String, x: f64, y: f64, z: f64) {
    out.push('{');
    write_key(out, "x");
    write_scalar(out, x);
    out.push(',');
    write_key(out, "y");
    write_scalar(out, y);
    out.push(',');
    write_key(out, "z");
    write_scalar(out, z);
    out.push('}');
}

impl WriteJson for Position {
    fn write_json(&self, out: &mut String) {
        write_xyz(out, self.x, self.y, self.z);
    }
}

impl WriteJson for Size {
    fn write_json(&self, out: &mut String) {
        write_xyz(out, self.x, self.y, self.z);
    }
}

impl WriteJson for Position2d {
    fn write_json(&self, out: &mut String) {
        out.push('{');
        write_key(out, "x");
        write_scalar(out, self.x);
        out.push(',');
        write_key(out, "y");
        write_scalar(out, self.y);
        out.push('}');
    }
}

impl WriteJson for UvMap {
    fn write_json(&self, out: &mut String) {
        out.push('{');
        write_key(out, "offset");
        self.offset.write_json(out);
        out.push(',');
        write_key(out, "size");
        self.size.write_json(out);
        out.push('}');
    }
}

impl WriteJson for Cuboid {
    fn write_json(&self, out: &mut String) {
        out.push('{');
        write_key(out, "start");
        self.start.write_json(out);
        out.push(',');
        write_key(out, "end");
        self.end.write_json(out);
        out.push(',');
        write_key(out, "uvMap");
        self.uv_map.write_json(out);
        out.push('}');
    }
}

impl WriteJson for ModelNode {
    fn write_json(&self, out: &mut String) {
        out.push('{');
        write_key(out, "name");
        write_string(out, &self.name);
        out.push(',');
        write_key(out, "mountPoint");
        self.mount_point.write_json(out);
        out.push(',');
        write_key(out, "mesh");
        write_array(out, &self.mesh);
        out.push(',');
        write_key(out, "children");
        write_array(out, &self.children);
        out.push('}');
    }
}
