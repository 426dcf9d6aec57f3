//! XML printer that outputs element trees.
//!
//! Output is deterministic: attributes are sorted by name, sibling groups
//! appear in slot insertion order, and a slot holding one element is emitted
//! in bare single-element form. The reserved identity attribute is never
//! written, even if a caller skipped the untag pass.

use std::io::Write;

use crate::constants::NODE_ID_ATTR;
use crate::error::Result;
use crate::tree::Element;

/// Options for XML printing.
#[derive(Debug, Clone, Default)]
pub struct XmlPrinterOptions {
    /// Whether to pretty-print with indentation.
    pub pretty_print: bool,
}

/// XML printer that outputs element trees.
pub struct XmlPrinter<W: Write> {
    writer: W,
    options: XmlPrinterOptions,
}

impl<W: Write> XmlPrinter<W> {
    /// Creates a new XML printer.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, XmlPrinterOptions::default())
    }

    /// Creates a new XML printer with the given options.
    pub fn with_options(writer: W, options: XmlPrinterOptions) -> Self {
        XmlPrinter { writer, options }
    }

    /// Prints an element tree preceded by the XML declaration.
    pub fn print(&mut self, root: &Element) -> std::io::Result<()> {
        write!(self.writer, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        if self.options.pretty_print {
            writeln!(self.writer)?;
        }
        self.print_element(root, 0)?;
        if !self.options.pretty_print {
            writeln!(self.writer)?;
        }
        self.writer.flush()
    }

    fn print_element(&mut self, el: &Element, indent: usize) -> std::io::Result<()> {
        if self.options.pretty_print {
            write!(self.writer, "{}", Self::indent_str(indent))?;
        }

        write!(self.writer, "<{}", el.name())?;

        let mut attr_names: Vec<&String> = el
            .attributes()
            .keys()
            .filter(|name| name.as_str() != NODE_ID_ATTR)
            .collect();
        attr_names.sort();
        for name in attr_names {
            let value = &el.attributes()[name];
            write!(self.writer, " {}=\"{}\"", name, to_entities(value))?;
        }

        if el.is_leaf() {
            write!(self.writer, " />")?;
            if self.options.pretty_print {
                writeln!(self.writer)?;
            }
            return Ok(());
        }

        write!(self.writer, ">")?;
        if let Some(text) = el.text() {
            write!(self.writer, "{}", to_entities(text))?;
        }

        let has_children = el.slots().next().is_some();
        if has_children {
            if self.options.pretty_print {
                writeln!(self.writer)?;
            }
            for (_, slot) in el.slots() {
                for child in slot.as_sequence() {
                    self.print_element(child, indent + 1)?;
                }
            }
            if self.options.pretty_print {
                write!(self.writer, "{}", Self::indent_str(indent))?;
            }
        }

        write!(self.writer, "</{}>", el.name())?;
        if self.options.pretty_print {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn indent_str(level: usize) -> String {
        "  ".repeat(level)
    }
}

/// Converts special characters to XML entities.
fn to_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\'' => result.push_str("&apos;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Serializes an element tree to a string.
pub fn serialize(root: &Element) -> Result<String> {
    let mut output = Vec::new();
    {
        let mut printer = XmlPrinter::new(&mut output);
        printer.print(root)?;
    }
    Ok(String::from_utf8_lossy(&output).to_string())
}

/// Serializes an element tree to a string with indentation.
pub fn serialize_pretty(root: &Element) -> Result<String> {
    let mut output = Vec::new();
    {
        let options = XmlPrinterOptions { pretty_print: true };
        let mut printer = XmlPrinter::with_options(&mut output, options);
        printer.print(root)?;
    }
    Ok(String::from_utf8_lossy(&output).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn test_print_simple() {
        let root = parse_str("<alto><Layout /></alto>").unwrap();
        let output = serialize(&root).unwrap();

        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(output.contains("<alto>"));
        assert!(output.contains("<Layout />"));
        assert!(output.contains("</alto>"));
    }

    #[test]
    fn test_attributes_sorted() {
        let root = parse_str(r#"<Page WIDTH="2" ID="p1" HEIGHT="3" />"#).unwrap();
        let output = serialize(&root).unwrap();
        assert!(output.contains(r#"<Page HEIGHT="3" ID="p1" WIDTH="2" />"#));
    }

    #[test]
    fn test_reserved_attr_never_emitted() {
        let mut root = parse_str(r#"<Page ID="p1" />"#).unwrap();
        root.set_attr(NODE_ID_ATTR, "n42");
        let output = serialize(&root).unwrap();
        assert!(!output.contains("$nodeId$"));
        assert!(!output.contains("n42"));
    }

    #[test]
    fn test_single_child_bare_form() {
        let root = parse_str("<a><b /><b /></a>").unwrap();
        let mut one = root.clone();
        let children = one.children_of("b")[..1].to_vec();
        one.set_children("b", children);

        let output = serialize(&one).unwrap();
        assert_eq!(output.matches("<b />").count(), 1);
    }

    #[test]
    fn test_entity_encoding() {
        let root = parse_str(r#"<String CONTENT="a&amp;b&lt;c">x &gt; y</String>"#).unwrap();
        let output = serialize(&root).unwrap();
        assert!(output.contains(r#"CONTENT="a&amp;b&lt;c""#));
        assert!(output.contains("x &gt; y"));
    }

    #[test]
    fn test_round_trip_structural() {
        let xml = r#"<alto SCHEMAVERSION="3.1">
            <Description><MeasurementUnit>pixel</MeasurementUnit></Description>
            <Layout>
              <Page ID="p1" WIDTH="2400" HEIGHT="3200">
                <PrintSpace>
                  <TextBlock ID="b1">
                    <TextLine><String CONTENT="Hello" /><SP /><String CONTENT="World" /></TextLine>
                  </TextBlock>
                </PrintSpace>
              </Page>
            </Layout>
          </alto>"#;
        let tree1 = parse_str(xml).unwrap();
        let output = serialize(&tree1).unwrap();
        let tree2 = parse_str(&output).unwrap();
        assert_eq!(tree1, tree2);
    }

    #[test]
    fn test_double_round_trip_identical_output() {
        let xml = r#"<alto><Layout><Page ID="p1"><PrintSpace /></Page></Layout></alto>"#;
        let tree1 = parse_str(xml).unwrap();
        let output1 = serialize(&tree1).unwrap();
        let tree2 = parse_str(&output1).unwrap();
        let output2 = serialize(&tree2).unwrap();
        assert_eq!(output1, output2);
    }

    #[test]
    fn test_pretty_print_round_trip() {
        let xml = r#"<alto><Layout><Page ID="p1"><PrintSpace /></Page></Layout></alto>"#;
        let tree1 = parse_str(xml).unwrap();
        let pretty = serialize_pretty(&tree1).unwrap();
        assert!(pretty.contains("\n  <Layout>"));
        let tree2 = parse_str(&pretty).unwrap();
        assert_eq!(tree1, tree2);
    }
}
