//! Token-splice shader templates
//!
//! Instance templates are stored as an ordered list of pieces instead of a
//! flat string with a magic placeholder substring. Splicing the instance
//! index in at explicit positions cannot collide with legitimate shader
//! text, no matter what the snippet contains.

/// One piece of an instance template
#[derive(Debug, Clone, Copy)]
pub enum Piece {
    /// Literal shader text
    Text(&'static str),
    /// Splice point for the instance index, rendered as `_N_`
    InstanceIndex,
}

/// A shader fragment instantiated once per repeated function instance
///
/// Every instance-local symbol (helper function names, uniforms) carries an
/// [`Piece::InstanceIndex`] splice so instances never collide.
#[derive(Debug, Clone, Copy)]
pub struct InstanceTemplate {
    pieces: &'static [Piece],
}

impl InstanceTemplate {
    /// Wrap a static piece list
    pub const fn new(pieces: &'static [Piece]) -> Self {
        Self { pieces }
    }

    /// Render the template for the `index`th instance of its kind
    pub fn render(&self, index: usize) -> String {
        let mut out = String::new();
        for piece in self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::InstanceIndex => {
                    out.push('_');
                    out.push_str(&index.to_string());
                    out.push('_');
                }
            }
        }
        out
    }
}

/// The dispatcher function wrapping the per-instance call statements
///
/// Rendered as `head`, then the newline-joined call statements, then
/// `tail`. With no instances the body is empty, which still yields a valid
/// no-effect shader function.
#[derive(Debug, Clone, Copy)]
pub struct DispatcherTemplate {
    head: &'static str,
    tail: &'static str,
}

impl DispatcherTemplate {
    /// Wrap the static head and tail text
    pub const fn new(head: &'static str, tail: &'static str) -> Self {
        Self { head, tail }
    }

    /// Render the dispatcher around the given call statements
    pub fn render(&self, calls: &[String]) -> String {
        let mut out = String::from(self.head);
        for call in calls {
            out.push_str(call);
            out.push('\n');
        }
        out.push_str(self.tail);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_index_splice() {
        const T: InstanceTemplate = InstanceTemplate::new(&[
            Piece::Text("uniform vec4 ClipPlane"),
            Piece::InstanceIndex,
            Piece::Text(";"),
        ]);
        assert_eq!(T.render(0), "uniform vec4 ClipPlane_0_;");
        assert_eq!(T.render(12), "uniform vec4 ClipPlane_12_;");
    }

    #[test]
    fn test_literal_underscore_text_is_untouched() {
        // Text containing what a substring-replacement scheme would treat
        // as a placeholder stays literal
        const T: InstanceTemplate = InstanceTemplate::new(&[
            Piece::Text("float helper_x_value = 0.0; // _x_ stays"),
        ]);
        assert_eq!(T.render(3), "float helper_x_value = 0.0; // _x_ stays");
    }

    #[test]
    fn test_empty_dispatcher_body() {
        const D: DispatcherTemplate = DispatcherTemplate::new("void f()\n{\n", "}\n");
        assert_eq!(D.render(&[]), "void f()\n{\n}\n");
    }
}
