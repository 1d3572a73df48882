//! Table rendering for the PDF export.
//!
//! Layout is computed in millimetres from a fixed character-width estimate
//! for the built-in Helvetica face, so no font metrics are needed.

use std::ops::Range;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};

use crate::ExportError;

const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_MM: f32 = 10.0;
const TITLE_BLOCK_MM: f32 = 12.0;
const FONT_SIZE_PT: f32 = 8.0;
const TITLE_SIZE_PT: f32 = 12.0;
const PT_TO_MM: f32 = 0.3528;
const LINE_HEIGHT_MM: f32 = FONT_SIZE_PT * PT_TO_MM * 1.25;
/// Average Helvetica glyph width as a fraction of the font size.
const CHAR_WIDTH_EM: f32 = 0.5;
const CELL_PADDING_MM: f32 = 1.5;
const LAYER_NAME: &str = "Table";

const HEADER_FILL: (u8, u8, u8) = (41, 128, 185);
const STRIPE_FILL: (u8, u8, u8) = (245, 245, 245);
const TEXT_DARK: (u8, u8, u8) = (33, 33, 33);
const TEXT_LIGHT: (u8, u8, u8) = (255, 255, 255);

/// Relative column widths; scaled to the printable width.
const COLUMN_WEIGHTS: [f32; 8] = [1.1, 1.6, 0.8, 1.0, 1.6, 1.4, 1.8, 0.7];

pub(crate) struct Table<'a> {
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub headers: &'a [&'a str],
    pub rows: &'a [Vec<String>],
}

pub(crate) fn column_widths(count: usize) -> Vec<f32> {
    let printable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let weights: Vec<f32> = (0..count)
        .map(|i| COLUMN_WEIGHTS.get(i).copied().unwrap_or(1.0))
        .collect();
    let total: f32 = weights.iter().sum();
    weights.iter().map(|w| printable * w / total).collect()
}

/// Characters that fit in a column of `width_mm` at the body font size.
pub(crate) fn chars_per_line(width_mm: f32) -> usize {
    let char_mm = FONT_SIZE_PT * PT_TO_MM * CHAR_WIDTH_EM;
    let usable = (width_mm - 2.0 * CELL_PADDING_MM).max(char_mm);
    ((usable / char_mm).floor() as usize).max(1)
}

/// Wraps `text` to at most `max_chars` per line. Explicit newlines are kept,
/// words are not split unless a single word is longer than a line.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }
        lines.push(current);
    }
    lines
}

/// Built-in PDF fonts only cover Latin-1.
pub(crate) fn latin1(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

pub(crate) fn row_height(line_count: usize) -> f32 {
    line_count.max(1) as f32 * LINE_HEIGHT_MM + 2.0 * CELL_PADDING_MM
}

/// Splits rows into pages. Each page holds the header plus as many rows as
/// fit in `available`; a row taller than a page gets a page of its own.
pub(crate) fn paginate(
    row_heights: &[f32],
    header_height: f32,
    first_available: f32,
    available: f32,
) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut room = first_available - header_height;
    for (index, height) in row_heights.iter().enumerate() {
        if *height > room && index > start {
            pages.push(start..index);
            start = index;
            room = available - header_height;
        }
        room -= height;
    }
    pages.push(start..row_heights.len());
    pages
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

struct Fonts {
    body: IndirectFontRef,
    bold: IndirectFontRef,
}

struct CellLayout {
    widths: Vec<f32>,
    max_chars: Vec<usize>,
}

impl CellLayout {
    fn new(columns: usize) -> Self {
        let widths = column_widths(columns);
        let max_chars = widths.iter().map(|w| chars_per_line(*w)).collect();
        Self { widths, max_chars }
    }

    fn wrap_row(&self, cells: &[String]) -> Vec<Vec<String>> {
        cells
            .iter()
            .zip(&self.max_chars)
            .map(|(cell, max)| wrap_text(&latin1(cell), *max))
            .collect()
    }
}

fn lines_in(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(1)
}

pub(crate) fn render_table(table: &Table<'_>) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        latin1(table.title),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME,
    );
    let fonts = Fonts {
        body: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(format!("font: {e:?}")))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(format!("font: {e:?}")))?,
    };

    let layout = CellLayout::new(table.headers.len());
    let header: Vec<String> = table.headers.iter().map(|h| h.to_string()).collect();
    let header_cells = layout.wrap_row(&header);
    let header_height = row_height(lines_in(&header_cells));
    let body: Vec<Vec<Vec<String>>> = table.rows.iter().map(|r| layout.wrap_row(r)).collect();
    let heights: Vec<f32> = body.iter().map(|cells| row_height(lines_in(cells))).collect();

    let full = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;
    let pages = paginate(&heights, header_height, full - TITLE_BLOCK_MM, full);

    let mut current = doc.get_page(page).get_layer(layer);
    let mut top = PAGE_HEIGHT_MM - MARGIN_MM;
    draw_title(&current, &fonts, table, top);
    top -= TITLE_BLOCK_MM;

    for (page_index, range) in pages.into_iter().enumerate() {
        if page_index > 0 {
            current = new_page(&doc);
            top = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        draw_row(&current, &fonts.bold, &layout, &header_cells, top, header_height, RowStyle::Header);
        top -= header_height;
        for index in range {
            let style = if index % 2 == 1 {
                RowStyle::Stripe
            } else {
                RowStyle::Plain
            };
            draw_row(&current, &fonts.body, &layout, &body[index], top, heights[index], style);
            top -= heights[index];
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(format!("save: {e:?}")))
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
    doc.get_page(page).get_layer(layer)
}

fn draw_title(layer: &PdfLayerReference, fonts: &Fonts, table: &Table<'_>, top: f32) {
    layer.set_fill_color(rgb(TEXT_DARK));
    layer.use_text(
        latin1(table.title),
        TITLE_SIZE_PT,
        Mm(MARGIN_MM),
        Mm(top - TITLE_SIZE_PT * PT_TO_MM),
        &fonts.bold,
    );
    if let Some(subtitle) = table.subtitle {
        layer.use_text(
            latin1(subtitle),
            FONT_SIZE_PT,
            Mm(MARGIN_MM),
            Mm(top - TITLE_BLOCK_MM + 2.0),
            &fonts.body,
        );
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RowStyle {
    Header,
    Stripe,
    Plain,
}

fn draw_row(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    layout: &CellLayout,
    cells: &[Vec<String>],
    top: f32,
    height: f32,
    style: RowStyle,
) {
    let left = MARGIN_MM;
    let right = PAGE_WIDTH_MM - MARGIN_MM;
    let fill = match style {
        RowStyle::Header => Some(HEADER_FILL),
        RowStyle::Stripe => Some(STRIPE_FILL),
        RowStyle::Plain => None,
    };
    if let Some(fill) = fill {
        layer.set_fill_color(rgb(fill));
        layer.add_rect(Rect::new(Mm(left), Mm(top - height), Mm(right), Mm(top)));
    }

    let text_color = if style == RowStyle::Header {
        TEXT_LIGHT
    } else {
        TEXT_DARK
    };
    layer.set_fill_color(rgb(text_color));

    let mut x = left;
    for (lines, width) in cells.iter().zip(&layout.widths) {
        let mut baseline = top - CELL_PADDING_MM - FONT_SIZE_PT * PT_TO_MM;
        for line in lines {
            if !line.is_empty() {
                layer.use_text(line.as_str(), FONT_SIZE_PT, Mm(x + CELL_PADDING_MM), Mm(baseline), font);
            }
            baseline -= LINE_HEIGHT_MM;
        }
        x += width;
    }
}
