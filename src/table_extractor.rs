/*!
 * Table extraction from markdown notes.
 *
 * A note is first rendered to HTML, then every `<table>` in the HTML is
 * scraped into a [`Table`]. Both steps sit behind traits so the renderer
 * and the scraper can be swapped independently:
 * - `MarkupRenderer`: markdown in, HTML out (`PulldownRenderer`)
 * - `TableScraper`: HTML in, tables out (`HtmlTableScraper`)
 *
 * Header cells name the columns and are not returned as data rows. Cell
 * values are the text content of the cell with inner markup stripped.
 */

use log::{debug, warn};
use pulldown_cmark::{html, Options, Parser};
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::ExtractError;
use crate::table::Table;

/// Renders note markup into HTML
pub trait MarkupRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// Finds the tables in an HTML document
pub trait TableScraper {
    fn scrape(&self, html: &str) -> Result<Vec<Table>, ExtractError>;
}

/// CommonMark renderer with GitHub-style tables
#[derive(Debug, Default, Clone, Copy)]
pub struct PulldownRenderer;

impl MarkupRenderer for PulldownRenderer {
    fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS;
        let parser = Parser::new_ext(markdown, options);

        let mut html_body = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_body, parser);
        html_body
    }
}

/// Lenient event-based HTML table scraper
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTableScraper;

// @struct: Table being assembled while its element is open
#[derive(Debug, Default)]
struct TableBuilder {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Option<Vec<String>>,
    cell: Option<String>,
    in_head: bool,
    row_is_header: bool,
}

impl TableBuilder {
    fn start_row(&mut self) {
        self.finish_row();
        self.row = Some(Vec::new());
        self.row_is_header = self.in_head;
    }

    fn start_cell(&mut self, is_header: bool) {
        self.finish_cell();
        if self.row.is_none() {
            self.start_row();
        }
        // The first cell decides whether the row is a header row
        if self.row.as_ref().is_some_and(Vec::is_empty) {
            self.row_is_header = self.in_head || is_header;
        }
        self.cell = Some(String::new());
    }

    fn push_text(&mut self, text: &str) {
        if let Some(cell) = self.cell.as_mut() {
            cell.push_str(text);
        }
    }

    fn finish_cell(&mut self) {
        if let Some(cell) = self.cell.take() {
            let value = cell.trim().to_string();
            match self.row.as_mut() {
                Some(row) => row.push(value),
                None => self.row = Some(vec![value]),
            }
        }
    }

    fn finish_row(&mut self) {
        self.finish_cell();
        if let Some(row) = self.row.take() {
            if row.is_empty() {
                return;
            }
            // Only the first header row names the columns
            if self.row_is_header && self.header.is_empty() && self.rows.is_empty() {
                self.header = row;
            } else {
                self.rows.push(row);
            }
        }
    }

    fn finish(mut self) -> Table {
        self.finish_row();
        Table::new(self.header, self.rows)
    }
}

// XML's predefined entities first, then the named HTML ones the renderer can emit
fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    if let Some(resolved) = resolve_predefined_entity(entity) {
        return Some(resolved);
    }
    match entity {
        "nbsp" => Some("\u{a0}"),
        "ndash" => Some("\u{2013}"),
        "mdash" => Some("\u{2014}"),
        "hellip" => Some("\u{2026}"),
        "laquo" => Some("\u{ab}"),
        "raquo" => Some("\u{bb}"),
        _ => None,
    }
}

fn decode_text(raw: &[u8]) -> String {
    let raw = String::from_utf8_lossy(raw);
    match unescape_with(&raw, resolve_html_entity) {
        Ok(text) => text.into_owned(),
        Err(e) => {
            warn!("Keeping undecoded cell text {:?}: {}", raw, e);
            raw.to_string()
        }
    }
}

impl TableScraper for HtmlTableScraper {
    fn scrape(&self, html: &str) -> Result<Vec<Table>, ExtractError> {
        let mut reader = Reader::from_str(html);
        {
            let config = reader.config_mut();
            config.check_end_names = false;
            config.allow_unmatched_ends = true;
        }

        let mut tables = Vec::new();
        // Nested tables are collected separately from their parent
        let mut open: Vec<TableBuilder> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                ExtractError::Markup(format!("{} at byte {}", e, reader.buffer_position()))
            })?;

            match event {
                Event::Start(element) => {
                    let name = element.local_name().as_ref().to_ascii_lowercase();
                    match name.as_slice() {
                        b"table" => open.push(TableBuilder::default()),
                        b"thead" => {
                            if let Some(table) = open.last_mut() {
                                table.finish_row();
                                table.in_head = true;
                            }
                        }
                        b"tbody" | b"tfoot" => {
                            if let Some(table) = open.last_mut() {
                                table.finish_row();
                                table.in_head = false;
                            }
                        }
                        b"tr" => {
                            if let Some(table) = open.last_mut() {
                                table.start_row();
                            }
                        }
                        b"th" | b"td" => {
                            if let Some(table) = open.last_mut() {
                                table.start_cell(name.as_slice() == b"th");
                            }
                        }
                        b"br" => {
                            if let Some(table) = open.last_mut() {
                                table.push_text(" ");
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(element) => {
                    let name = element.local_name().as_ref().to_ascii_lowercase();
                    match name.as_slice() {
                        b"table" => {
                            if let Some(table) = open.pop() {
                                tables.push(table.finish());
                            }
                        }
                        b"thead" => {
                            if let Some(table) = open.last_mut() {
                                table.finish_row();
                                table.in_head = false;
                            }
                        }
                        b"tr" => {
                            if let Some(table) = open.last_mut() {
                                table.finish_row();
                            }
                        }
                        b"th" | b"td" => {
                            if let Some(table) = open.last_mut() {
                                table.finish_cell();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Empty(element) => {
                    if element.local_name().as_ref().eq_ignore_ascii_case(b"br") {
                        if let Some(table) = open.last_mut() {
                            table.push_text(" ");
                        }
                    }
                }
                Event::Text(text) => {
                    if let Some(table) = open.last_mut() {
                        table.push_text(&decode_text(&text));
                    }
                }
                Event::CData(text) => {
                    if let Some(table) = open.last_mut() {
                        table.push_text(&String::from_utf8_lossy(&text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        // Tables left open by truncated markup are still returned
        while let Some(table) = open.pop() {
            tables.push(table.finish());
        }

        Ok(tables)
    }
}

/// Renders a note and scrapes its tables
pub struct TableExtractor {
    renderer: Box<dyn MarkupRenderer>,
    scraper: Box<dyn TableScraper>,
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new(Box::new(PulldownRenderer), Box::new(HtmlTableScraper))
    }
}

impl TableExtractor {
    pub fn new(renderer: Box<dyn MarkupRenderer>, scraper: Box<dyn TableScraper>) -> Self {
        Self { renderer, scraper }
    }

    /// Extract every table of a note in document order.
    ///
    /// A note without tables yields an empty list, not an error.
    pub fn extract(&self, markdown: &str) -> Result<Vec<Table>, ExtractError> {
        let html = self.renderer.render(markdown);
        let tables = self.scraper.scrape(&html)?;
        if tables.is_empty() {
            debug!("No tables found");
        }
        Ok(tables)
    }
}

/// Extract the tables of a note with the default renderer and scraper
pub fn extract(markdown: &str) -> Result<Vec<Table>, ExtractError> {
    TableExtractor::default().extract(markdown)
}
