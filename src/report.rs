/*!
 * PDF report of frame details.
 *
 * Every frame gets its own page: a "Frame N" heading followed by a two column
 * Field/Value table. Long values wrap inside their cell and rows that do not
 * fit continue on the next page. The document uses the standard Helvetica
 * fonts, so text outside the WinAnsi character set is replaced by `?`.
 */

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use log::debug;

use crate::app_config::ReportConfig;
use crate::errors::ReportError;
use crate::frame::FrameRecord;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

const TITLE_SIZE: f32 = 16.0;
const HEADER_SIZE: f32 = 10.0;
const CELL_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 8.0;
const LINE_GAP: f32 = 2.0;
const MIN_TABLE_WIDTH: f32 = 120.0;

// Rough Helvetica advance width as a fraction of the font size
const AVG_CHAR_WIDTH: f32 = 0.55;

// Share of the table width taken by the field column
const LABEL_COLUMN_SHARE: f32 = 2.5 / 7.0;

type Rgb = (f32, f32, f32);

const TITLE_COLOR: Rgb = (0.173, 0.243, 0.314); // #2c3e50
const HEADER_FILL: Rgb = (0.204, 0.596, 0.859); // #3498db
const LABEL_FILL: Rgb = (0.925, 0.941, 0.945); // #ecf0f1
const GRID_COLOR: Rgb = (0.741, 0.765, 0.780); // #bdc3c7
const BLACK: Rgb = (0.0, 0.0, 0.0);
const WHITE: Rgb = (1.0, 1.0, 1.0);

/// Field/value rows of a frame's table, in display order
pub fn frame_rows(frame: &FrameRecord) -> Vec<(&'static str, String)> {
    vec![
        ("Frame Number", frame.frame_number.clone()),
        ("Frame Tone", frame.frame_tone.clone()),
        ("Content (Dialogues / Narration)", frame.content.clone()),
        ("Frame Type", frame.frame_type.clone()),
        ("Voice Over Required?", yes_no(frame.voice_over_required)),
        ("Editing Required?", yes_no(frame.editing_required)),
        ("Facilitator Costume / Props", frame.facilitator_costume_props.clone()),
        ("Scene Description", frame.scene_description.clone()),
        ("Camera / Cinematographer Notes", frame.camera_notes.clone()),
        ("Editing Notes", frame.editing_notes.clone()),
        ("Suggestions for Frame Improvement", frame.suggestions.clone()),
    ]
}

/// Render the frames as a PDF document
pub fn render_pdf(frames: &[FrameRecord], config: &ReportConfig) -> Result<Vec<u8>, ReportError> {
    if frames.is_empty() {
        return Err(ReportError::NoFrames);
    }
    check_page_fits(config)?;

    let mut layout = PageLayout::new(config);
    layout.heading(&config.title);

    for (idx, frame) in frames.iter().enumerate() {
        if idx > 0 {
            layout.new_page();
        }
        layout.heading(&format!("Frame {}", frame.frame_number));
        layout.table(&frame_rows(frame));
    }

    let pages = layout.finish();
    debug!("Rendering {} frame(s) on {} page(s)", frames.len(), pages.len());
    build_document(pages, config)
}

// A fresh page must hold a heading, the table header and one body line,
// otherwise rows would keep spilling onto new pages without drawing
fn check_page_fits(config: &ReportConfig) -> Result<(), ReportError> {
    let (width, height) = config.page_size.dimensions();
    let margin = config.margin_pt;

    let needed_height = (TITLE_SIZE + 14.0)
        + (HEADER_SIZE + LINE_GAP + 2.0 * CELL_PADDING)
        + (CELL_SIZE + LINE_GAP + 2.0 * CELL_PADDING);
    let fits = margin.is_finite()
        && margin >= 0.0
        && height - 2.0 * margin >= needed_height
        && width - 2.0 * margin >= MIN_TABLE_WIDTH;

    if fits {
        Ok(())
    } else {
        Err(ReportError::Pdf(format!(
            "a {}pt margin leaves no room for the frame table on a {}x{}pt page",
            margin, width, height
        )))
    }
}

/// Greedy word wrap to a width in points. Always returns at least one line.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let max_chars = ((max_width / (font_size * AVG_CHAR_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();

            if line_len > 0 && line_len + 1 + word_len > max_chars {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }

            if word_len > max_chars {
                // Hard-split words that cannot fit on any line
                let chars: Vec<char> = word.chars().collect();
                for chunk in chars.chunks(max_chars) {
                    if line_len > 0 {
                        lines.push(std::mem::take(&mut line));
                    }
                    line = chunk.iter().collect();
                    line_len = chunk.len();
                }
                continue;
            }

            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }

        lines.push(line);
    }

    lines
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

/// Accumulates drawing operations page by page
struct PageLayout {
    width: f32,
    height: f32,
    margin: f32,
    cursor_y: f32,
    pages: Vec<Vec<Operation>>,
}

impl PageLayout {
    fn new(config: &ReportConfig) -> Self {
        let (width, height) = config.page_size.dimensions();
        Self {
            width,
            height,
            margin: config.margin_pt,
            cursor_y: height - config.margin_pt,
            pages: vec![Vec::new()],
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor_y = self.height - self.margin;
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        // `pages` starts non-empty and only grows
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn table_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    fn heading(&mut self, text: &str) {
        let line_height = TITLE_SIZE + 14.0;
        if self.cursor_y - line_height < self.margin {
            self.new_page();
        }

        let baseline = self.cursor_y - TITLE_SIZE;
        let x = self.margin;
        self.text(BOLD_FONT, TITLE_SIZE, TITLE_COLOR, x, baseline, text);
        self.cursor_y -= line_height;
    }

    fn table(&mut self, rows: &[(&'static str, String)]) {
        let label_width = self.table_width() * LABEL_COLUMN_SHARE;
        let value_width = self.table_width() - label_width;

        self.row(
            &[("Field", label_width), ("Value", value_width)],
            BOLD_FONT,
            HEADER_SIZE,
            (Some(HEADER_FILL), Some(HEADER_FILL)),
            WHITE,
        );

        for (label, value) in rows {
            self.body_row(label, value, label_width, value_width);
        }
    }

    /// Single-line row, used for the header
    fn row(&mut self, cells: &[(&str, f32); 2], font: &str, size: f32, fills: (Option<Rgb>, Option<Rgb>), color: Rgb) {
        let height = size + LINE_GAP + 2.0 * CELL_PADDING;
        if self.cursor_y - height < self.margin {
            self.new_page();
        }

        let top = self.cursor_y;
        let mut x = self.margin;
        for (idx, (text, width)) in cells.iter().enumerate() {
            let fill = if idx == 0 { fills.0 } else { fills.1 };
            self.cell_box(x, top, *width, height, fill);
            self.text(font, size, color, x + CELL_PADDING, top - CELL_PADDING - size, text);
            x += width;
        }
        self.cursor_y -= height;
    }

    /// Row whose value may wrap and span pages
    fn body_row(&mut self, label: &str, value: &str, label_width: f32, value_width: f32) {
        let leading = CELL_SIZE + LINE_GAP;
        let label_lines = wrap_text(label, label_width - 2.0 * CELL_PADDING, CELL_SIZE);
        let value_lines = wrap_text(value, value_width - 2.0 * CELL_PADDING, CELL_SIZE);
        let total = label_lines.len().max(value_lines.len());
        let mut drawn = 0;

        while drawn < total {
            let available = ((self.cursor_y - self.margin - 2.0 * CELL_PADDING) / leading).floor();
            if available < 1.0 {
                self.new_page();
                continue;
            }

            let take = (available as usize).min(total - drawn);
            let height = take as f32 * leading + 2.0 * CELL_PADDING;
            let top = self.cursor_y;
            let value_x = self.margin + label_width;

            self.cell_box(self.margin, top, label_width, height, Some(LABEL_FILL));
            self.cell_box(value_x, top, value_width, height, None);

            for line in 0..take {
                let baseline = top - CELL_PADDING - CELL_SIZE - line as f32 * leading;
                if let Some(text) = label_lines.get(drawn + line) {
                    self.text(BOLD_FONT, CELL_SIZE, BLACK, self.margin + CELL_PADDING, baseline, text);
                }
                if let Some(text) = value_lines.get(drawn + line) {
                    self.text(REGULAR_FONT, CELL_SIZE, BLACK, value_x + CELL_PADDING, baseline, text);
                }
            }

            drawn += take;
            self.cursor_y -= height;
        }
    }

    fn cell_box(&mut self, x: f32, top: f32, width: f32, height: f32, fill: Option<Rgb>) {
        let bottom = top - height;
        let ops = self.ops();

        if let Some((r, g, b)) = fill {
            ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
            ops.push(Operation::new("re", vec![x.into(), bottom.into(), width.into(), height.into()]));
            ops.push(Operation::new("f", vec![]));
        }

        let (r, g, b) = GRID_COLOR;
        ops.push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
        ops.push(Operation::new("w", vec![1.into()]));
        ops.push(Operation::new("re", vec![x.into(), bottom.into(), width.into(), height.into()]));
        ops.push(Operation::new("S", vec![]));
    }

    fn text(&mut self, font: &str, size: f32, (r, g, b): Rgb, x: f32, y: f32, text: &str) {
        if text.is_empty() {
            return;
        }

        let ops = self.ops();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]));
        ops.push(Operation::new("ET", vec![]));
    }

    fn finish(self) -> Vec<Vec<Operation>> {
        self.pages
    }
}

fn build_document(pages: Vec<Vec<Operation>>, config: &ReportConfig) -> Result<Vec<u8>, ReportError> {
    let (width, height) = config.page_size.dimensions();
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Encode text for a WinAnsi (CP-1252) font
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}
