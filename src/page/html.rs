use crate::Result;
use crate::charts::Canvas;
use crate::page::{Document, Element, Node};
use core::fmt::Write;

/// Write `document` as a complete HTML page.
pub fn generate<W: Write>(document: &Document, writer: &mut W) -> Result<()> {
    let mut generator = HtmlGenerator::new(writer, document);
    generator.generate()
}

struct HtmlGenerator<'a, W: Write> {
    writer: &'a mut W,
    document: &'a Document,
}

impl<'a, W: Write> HtmlGenerator<'a, W> {
    const fn new(writer: &'a mut W, document: &'a Document) -> Self {
        Self { writer, document }
    }

    fn generate(&mut self) -> Result<()> {
        self.write_header()?;
        self.write_styles()?;
        self.write_body_start()?;

        for child in self.document.body().children() {
            self.write_node(child, 1)?;
        }

        self.write_footer()?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "<!DOCTYPE html>")?;
        writeln!(self.writer, "<html lang=\"en\">")?;
        writeln!(self.writer, "<head>")?;
        writeln!(self.writer, "<meta charset=\"UTF-8\">")?;
        writeln!(
            self.writer,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(self.writer, "<title>{}</title>", html_escape(self.document.title()))?;
        Ok(())
    }

    fn write_styles(&mut self) -> Result<()> {
        writeln!(self.writer, "<style>")?;
        writeln!(self.writer, ":root {{")?;
        writeln!(self.writer, "  color-scheme: light;")?;
        writeln!(self.writer, "}}")?;
        writeln!(self.writer)?;

        writeln!(self.writer, "body {{")?;
        writeln!(
            self.writer,
            "  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;"
        )?;
        writeln!(self.writer, "  background: #ffffff;")?;
        writeln!(self.writer, "  color: #1a1a1a;")?;
        writeln!(self.writer, "  margin: 0;")?;
        writeln!(self.writer, "  padding: 20px;")?;
        writeln!(self.writer, "}}")?;
        writeln!(self.writer)?;

        writeln!(self.writer, "h1 {{")?;
        writeln!(self.writer, "  font-size: 2rem;")?;
        writeln!(self.writer, "  margin-bottom: 1.5rem;")?;
        writeln!(self.writer, "}}")?;
        writeln!(self.writer)?;

        writeln!(self.writer, ".repo-block {{")?;
        writeln!(self.writer, "  display: inline-block;")?;
        writeln!(self.writer, "  vertical-align: top;")?;
        writeln!(self.writer, "  margin: 0 20px 30px 0;")?;
        writeln!(self.writer, "}}")?;
        writeln!(self.writer)?;

        writeln!(self.writer, ".repo-block h2 {{")?;
        writeln!(self.writer, "  font-size: 1.2rem;")?;
        writeln!(self.writer, "  font-weight: 600;")?;
        writeln!(self.writer, "}}")?;
        writeln!(self.writer)?;

        writeln!(self.writer, ".repo.chart svg {{")?;
        writeln!(self.writer, "  display: block;")?;
        writeln!(self.writer, "}}")?;
        writeln!(self.writer, "</style>")?;
        Ok(())
    }

    fn write_body_start(&mut self) -> Result<()> {
        writeln!(self.writer, "</head>")?;
        writeln!(self.writer, "<body>")?;
        Ok(())
    }

    fn write_node(&mut self, node: &Node, depth: usize) -> Result<()> {
        match node {
            Node::Element(element) => self.write_element(element, depth),
            Node::Canvas(canvas) => self.write_canvas(canvas),
        }
    }

    fn write_element(&mut self, element: &Element, depth: usize) -> Result<()> {
        let indent = "  ".repeat(depth);
        let tag = html_escape(element.tag());

        write!(self.writer, "{indent}<{tag}")?;
        if let Some(id) = element.id() {
            write!(self.writer, " id=\"{}\"", html_escape(id))?;
        }
        if !element.classes().is_empty() {
            write!(self.writer, " class=\"{}\"", html_escape(&element.classes().join(" ")))?;
        }
        write!(self.writer, ">")?;

        if let Some(text) = element.text() {
            write!(self.writer, "{}", html_escape(text))?;
        }

        if element.children().is_empty() {
            writeln!(self.writer, "</{tag}>")?;
            return Ok(());
        }

        writeln!(self.writer)?;
        for child in element.children() {
            self.write_node(child, depth + 1)?;
        }
        writeln!(self.writer, "{indent}</{tag}>")?;
        Ok(())
    }

    fn write_canvas(&mut self, canvas: &Canvas) -> Result<()> {
        canvas.write_svg(&mut *self.writer)?;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        writeln!(self.writer, "</body>")?;
        writeln!(self.writer, "</html>")?;
        Ok(())
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
