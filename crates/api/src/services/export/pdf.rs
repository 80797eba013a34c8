//! PDF rendering of the record list.
//!
//! Rendering happens in two steps. [`layout_records`] turns the records into
//! positioned pages (title, header rows, wrapped cell text), then
//! [`PdfWriter`] draws each page with `printpdf` and notifies every registered
//! [`PageEventHandler`] once the page content is complete. The page-number
//! footer is one such handler.

use chrono::NaiveDateTime;
use domain::models::Record;
use printpdf::lopdf::{self, Object, StringFormat};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, OffsetDateTime, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Pt,
};
use tracing::warn;

use super::font_metrics::text_width;
use super::{ExportError, COLUMN_HEADERS};

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const PAGE_MARGIN: f32 = 36.0;

pub const DOCUMENT_TITLE: &str = "User Records List";
const TITLE_FONT_SIZE: f32 = 18.0;
const TITLE_MARGIN_BOTTOM: f32 = 5.0;
const TABLE_MARGIN_TOP: f32 = 10.0;

const BODY_FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT_FACTOR: f32 = 1.2;
const CELL_PADDING: f32 = 2.0;
const BORDER_WIDTH: f32 = 0.5;
const COLUMN_WEIGHTS: [f32; 5] = [1.0, 3.0, 3.0, 1.0, 3.0];

const FOOTER_FONT_SIZE: f32 = 12.0;
const FOOTER_RIGHT_INSET: f32 = 40.0;
const PAGE_NUMBER_TOP_INSET: f32 = 20.0;
const TIMESTAMP_TOP_INSET: f32 = 40.0;
/// MM/dd/yyyy hh:mm:ss AM|PM
pub const FOOTER_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Text encoding of the built-in Helvetica fonts.
const BUILTIN_FONT_ENCODING: &str = "WinAnsiEncoding";

/// Horizontal anchoring of a text run relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Left,
    Center,
    Right,
}

/// A single positioned line of text. `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub bold: bool,
    pub alignment: TextAlignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Data,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellLayout {
    pub x: f32,
    pub width: f32,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub kind: RowKind,
    /// Y coordinate of the row's top edge.
    pub top: f32,
    pub height: f32,
    pub cells: Vec<CellLayout>,
}

impl RowLayout {
    /// Cell contents with wrapped lines joined back by a space.
    pub fn cell_texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.lines.join(" ")).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub title: Option<TextRun>,
    pub rows: Vec<RowLayout>,
}

impl PageLayout {
    pub fn data_rows(&self) -> impl Iterator<Item = &RowLayout> {
        self.rows.iter().filter(|r| r.kind == RowKind::Data)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

fn line_height() -> f32 {
    BODY_FONT_SIZE * LINE_HEIGHT_FACTOR
}

/// Column x offsets and widths across the printable width.
fn column_bounds() -> Vec<(f32, f32)> {
    let available = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
    let total: f32 = COLUMN_WEIGHTS.iter().sum();
    let mut x = PAGE_MARGIN;
    COLUMN_WEIGHTS
        .iter()
        .map(|weight| {
            let width = available * weight / total;
            let bounds = (x, width);
            x += width;
            bounds
        })
        .collect()
}

/// Greedy word wrap. Words wider than `max_width` are broken by character.
pub fn wrap_text(text: &str, max_width: f32, bold: bool, font_size: f32) -> Vec<String> {
    let fits = |s: &str| text_width(s, bold, font_size) <= max_width;
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if fits(word) {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn build_row(kind: RowKind, texts: &[String], columns: &[(f32, f32)]) -> RowLayout {
    let bold = kind == RowKind::Header;
    let cells: Vec<CellLayout> = texts
        .iter()
        .zip(columns)
        .map(|(text, &(x, width))| CellLayout {
            x,
            width,
            lines: wrap_text(text, width - 2.0 * CELL_PADDING, bold, BODY_FONT_SIZE),
        })
        .collect();
    let max_lines = cells.iter().map(|c| c.lines.len()).max().unwrap_or(1);

    RowLayout {
        kind,
        top: 0.0,
        height: max_lines as f32 * line_height() + 2.0 * CELL_PADDING,
        cells,
    }
}

fn record_cells(record: &Record) -> Vec<String> {
    vec![
        record.id.to_string(),
        record.name.clone(),
        record.surname.clone(),
        record.age.to_string(),
        record.phone_number.clone(),
    ]
}

/// Lays the records out as a titled, paginated table.
///
/// The title appears on the first page only. Every page starts its table
/// with the header row. Records keep their input order.
pub fn layout_records(records: &[Record]) -> DocumentLayout {
    let columns = column_bounds();
    let header_texts: Vec<String> = COLUMN_HEADERS.iter().map(|h| h.to_string()).collect();
    let header = build_row(RowKind::Header, &header_texts, &columns);
    let bottom = PAGE_MARGIN;

    let mut page = PageLayout {
        title: Some(TextRun {
            text: DOCUMENT_TITLE.to_string(),
            x: PAGE_WIDTH / 2.0,
            y: PAGE_HEIGHT - PAGE_MARGIN - TITLE_FONT_SIZE,
            font_size: TITLE_FONT_SIZE,
            bold: true,
            alignment: TextAlignment::Center,
        }),
        rows: Vec::new(),
    };
    let mut cursor = PAGE_HEIGHT
        - PAGE_MARGIN
        - TITLE_FONT_SIZE * LINE_HEIGHT_FACTOR
        - TITLE_MARGIN_BOTTOM
        - TABLE_MARGIN_TOP;

    let place = |page: &mut PageLayout, cursor: &mut f32, mut row: RowLayout| {
        row.top = *cursor;
        *cursor -= row.height;
        page.rows.push(row);
    };

    place(&mut page, &mut cursor, header.clone());

    let mut pages = Vec::new();
    for record in records {
        let row = build_row(RowKind::Data, &record_cells(record), &columns);
        let page_has_data = page.rows.iter().any(|r| r.kind == RowKind::Data);
        if cursor - row.height < bottom && page_has_data {
            pages.push(std::mem::take(&mut page));
            cursor = PAGE_HEIGHT - PAGE_MARGIN;
            place(&mut page, &mut cursor, header.clone());
        }
        place(&mut page, &mut cursor, row);
    }
    pages.push(page);

    DocumentLayout { pages }
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Drawing surface for a single page.
pub struct Canvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
}

impl Canvas<'_> {
    /// Draws `text` with its baseline at `y`, anchored at `x` per `alignment`.
    pub fn show_text_aligned(
        &self,
        text: &str,
        x: f32,
        y: f32,
        alignment: TextAlignment,
        font_size: f32,
        bold: bool,
    ) {
        let width = text_width(text, bold, font_size);
        let left = match alignment {
            TextAlignment::Left => x,
            TextAlignment::Center => x - width / 2.0,
            TextAlignment::Right => x - width,
        };
        let font = if bold {
            &self.fonts.bold
        } else {
            &self.fonts.regular
        };
        self.layer.use_text(text, font_size, mm(left), mm(y), font);
    }

    fn draw_run(&self, run: &TextRun) {
        self.show_text_aligned(
            &run.text,
            run.x,
            run.y,
            run.alignment,
            run.font_size,
            run.bold,
        );
    }

    fn stroke_rect(&self, x: f32, top: f32, width: f32, height: f32) {
        let bottom = top - height;
        let corners = [
            (x, top),
            (x + width, top),
            (x + width, bottom),
            (x, bottom),
        ];
        self.layer.add_line(Line {
            points: corners
                .iter()
                .map(|&(px, py)| (Point::new(mm(px), mm(py)), false))
                .collect(),
            is_closed: true,
        });
    }

    fn draw_row(&self, row: &RowLayout) {
        let bold = row.kind == RowKind::Header;
        for cell in &row.cells {
            self.stroke_rect(cell.x, row.top, cell.width, row.height);
            for (i, line) in cell.lines.iter().enumerate() {
                let baseline =
                    row.top - CELL_PADDING - BODY_FONT_SIZE - i as f32 * line_height();
                self.show_text_aligned(
                    line,
                    cell.x + CELL_PADDING,
                    baseline,
                    TextAlignment::Left,
                    BODY_FONT_SIZE,
                    bold,
                );
            }
        }
    }
}

/// What a page event handler sees of a finished page.
pub struct PageContext<'a> {
    page_number: usize,
    canvas: &'a Canvas<'a>,
}

impl PageContext<'_> {
    /// 1-based page number in rendering order.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn page_width(&self) -> f32 {
        PAGE_WIDTH
    }

    pub fn page_height(&self) -> f32 {
        PAGE_HEIGHT
    }

    pub fn canvas(&self) -> &Canvas<'_> {
        self.canvas
    }
}

/// Callback fired once per page after its content has been drawn.
pub trait PageEventHandler {
    fn on_end_page(&mut self, page: &PageContext<'_>);
}

/// Draws `Page no: N` and the rendering time in the top-right corner.
pub struct PageNumberFooter {
    timestamp: String,
}

impl PageNumberFooter {
    pub fn new(rendered_at: NaiveDateTime) -> Self {
        Self {
            timestamp: format_footer_timestamp(rendered_at),
        }
    }

    pub fn page_label(page_number: usize) -> String {
        format!("Page no: {}", page_number)
    }

    pub fn date_label(&self) -> String {
        format!("Date: {}", self.timestamp)
    }
}

impl PageEventHandler for PageNumberFooter {
    fn on_end_page(&mut self, page: &PageContext<'_>) {
        let x = page.page_width() - FOOTER_RIGHT_INSET;
        let top = page.page_height();

        page.canvas().show_text_aligned(
            &Self::page_label(page.page_number()),
            x,
            top - PAGE_NUMBER_TOP_INSET,
            TextAlignment::Right,
            FOOTER_FONT_SIZE,
            false,
        );
        page.canvas().show_text_aligned(
            &self.date_label(),
            x,
            top - TIMESTAMP_TOP_INSET,
            TextAlignment::Right,
            FOOTER_FONT_SIZE,
            false,
        );
    }
}

pub fn format_footer_timestamp(rendered_at: NaiveDateTime) -> String {
    rendered_at.format(FOOTER_TIMESTAMP_FORMAT).to_string()
}

/// Whether every character of `text` exists in the built-in font encoding.
/// Characters that do not are dropped when the text is written.
pub fn font_can_encode(text: &str) -> bool {
    let encoded = lopdf::Document::encode_text(Some(BUILTIN_FONT_ENCODING), text);
    encoded.len() == text.encode_utf16().count()
}

/// File identifier written to the trailer `/ID`, derived from the render time.
fn document_id(rendered_at: NaiveDateTime) -> String {
    format!("{:0<32}", rendered_at.format("%Y%m%d%H%M%S%9f"))
}

fn metadata_date(rendered_at: NaiveDateTime) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(rendered_at.and_utc().timestamp())
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Writes a [`DocumentLayout`] to PDF bytes, firing page events as it goes.
pub struct PdfWriter {
    doc: PdfDocumentReference,
    document_id: String,
    fonts: Fonts,
    first_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    pages_written: usize,
    handlers: Vec<Box<dyn PageEventHandler>>,
}

impl PdfWriter {
    /// Starts a document whose metadata dates and file identifier all come
    /// from `rendered_at`, so equal inputs produce equal bytes.
    pub fn new(title: &str, rendered_at: NaiveDateTime) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
        let date = metadata_date(rendered_at);
        let doc = doc
            .with_creation_date(date)
            .with_mod_date(date)
            .with_metadata_date(date);
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        Ok(Self {
            doc,
            document_id: document_id(rendered_at),
            fonts: Fonts { regular, bold },
            first_page: Some((page, layer)),
            pages_written: 0,
            handlers: Vec::new(),
        })
    }

    pub fn add_event_handler<H: PageEventHandler + 'static>(&mut self, handler: H) {
        self.handlers.push(Box::new(handler));
    }

    fn next_layer(&mut self) -> PdfLayerReference {
        // PdfDocument::new already created the first page.
        let (page, layer) = self.first_page.take().unwrap_or_else(|| {
            self.doc.add_page(
                mm(PAGE_WIDTH),
                mm(PAGE_HEIGHT),
                format!("Layer {}", self.pages_written + 1),
            )
        });
        self.doc.get_page(page).get_layer(layer)
    }

    pub fn write(mut self, layout: &DocumentLayout) -> Result<Vec<u8>, ExportError> {
        for page in &layout.pages {
            let layer = self.next_layer();
            self.pages_written += 1;

            let canvas = Canvas {
                layer,
                fonts: &self.fonts,
            };
            canvas.layer.set_outline_thickness(BORDER_WIDTH);
            if let Some(title) = &page.title {
                canvas.draw_run(title);
            }
            for row in &page.rows {
                canvas.draw_row(row);
            }

            let context = PageContext {
                page_number: self.pages_written,
                canvas: &canvas,
            };
            for handler in self.handlers.iter_mut() {
                handler.on_end_page(&context);
            }
        }

        let bytes = self.doc.save_to_bytes()?;
        Ok(with_file_id(&bytes, &self.document_id)?)
    }
}

/// Replaces the randomly generated trailer `/ID` pair with `id`.
fn with_file_id(bytes: &[u8], id: &str) -> Result<Vec<u8>, lopdf::Error> {
    let mut document = lopdf::Document::load_mem(bytes)?;
    let id = Object::String(id.as_bytes().to_vec(), StringFormat::Literal);
    document.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    let mut out = Vec::with_capacity(bytes.len());
    document.save_to(&mut out)?;
    Ok(out)
}

/// Renders the records as a paginated PDF with the page-number footer.
pub fn render_pdf(records: &[Record], rendered_at: NaiveDateTime) -> Result<Vec<u8>, ExportError> {
    for record in records {
        let fields = [&record.name, &record.surname, &record.phone_number];
        if !fields.iter().all(|field| font_can_encode(field)) {
            warn!(
                record_id = record.id,
                "Record has characters outside the PDF font encoding, they are left out"
            );
        }
    }

    let mut writer = PdfWriter::new(DOCUMENT_TITLE, rendered_at)?;
    writer.add_event_handler(PageNumberFooter::new(rendered_at));
    writer.write(&layout_records(records))
}
