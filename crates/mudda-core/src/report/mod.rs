//! Printable case report.
//!
//! The renderer lays out an A4 revenue-deposit sheet as a display list of
//! positioned text runs and value boxes, each naming the face it needs.
//! [`RenderContext::to_pdf`] paints that list into a PDF with the faces
//! loaded when the context was built.

mod pdf;
pub mod script;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::calendar::BsDate;
use crate::case::{Bank, CaseRecord};
use crate::numerals::{format_local_money, localize_case_number, to_local_digits};
use crate::{MuddaError, MuddaResult};

pub use script::{segment_scripts, Script, ScriptRun};

// ---------------------------------------------------------------------------
// Fonts and context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFace {
    /// Name the backend registers the face under.
    pub name: String,
    /// TrueType file; `None` for a backend built-in face.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Mean glyph advance as a fraction of the font size, for run placement.
    pub average_advance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSet {
    pub devanagari: FontFace,
    pub latin: FontFace,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            devanagari: FontFace {
                name: "NotoDevanagari".into(),
                path: Some(PathBuf::from("staticfiles/fonts/Kalimati.ttf")),
                average_advance: 0.62,
            },
            latin: FontFace {
                name: "Helvetica".into(),
                path: None,
                average_advance: 0.52,
            },
        }
    }
}

impl FontSet {
    fn face(&self, script: Script) -> &FontFace {
        match script {
            Script::Devanagari => &self.devanagari,
            Script::Latin => &self.latin,
        }
    }
}

/// Header lines printed at the top of every report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportHeader {
    pub tribunal: String,
    pub subtitle: String,
}

impl Default for ReportHeader {
    fn default() -> Self {
        Self {
            tribunal: "ऋण असुली न्यायाधिकरण".into(),
            subtitle: "राजस्व रकम दाखिला".into(),
        }
    }
}

/// Page geometry in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub header_size: f32,
    pub body_size: f32,
    pub first_row_y: f32,
    pub continuation_y: f32,
    pub line_height: f32,
    /// A new page starts once the cursor falls below this.
    pub break_below: f32,
    pub label_x: f32,
    pub value_x: f32,
    pub label2_x: f32,
    pub value2_x: f32,
    pub box_width: f32,
    pub wide_box_width: f32,
    pub box_height: f32,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            page_width: 595.27,
            page_height: 841.89,
            header_size: 16.0,
            body_size: 12.0,
            first_row_y: 710.0,
            continuation_y: 800.0,
            line_height: 30.0,
            break_below: 100.0,
            label_x: 60.0,
            value_x: 190.0,
            label2_x: 320.0,
            value2_x: 440.0,
            box_width: 110.0,
            wide_box_width: 300.0,
            box_height: 20.0,
        }
    }
}

/// Raw TrueType data for the faces that name a file.
#[derive(Debug, Clone, Default)]
struct LoadedFonts {
    devanagari: Option<Vec<u8>>,
    latin: Option<Vec<u8>>,
}

/// Fonts, header and geometry, set up once and reused for every report.
#[derive(Debug, Clone)]
pub struct RenderContext {
    fonts: FontSet,
    header: ReportHeader,
    layout: ReportLayout,
    loaded: LoadedFonts,
}

impl RenderContext {
    /// Build the context, reading every font file it refers to.
    pub fn new(fonts: FontSet, header: ReportHeader, layout: ReportLayout) -> MuddaResult<Self> {
        let loaded = LoadedFonts {
            devanagari: read_face(&fonts.devanagari)?,
            latin: read_face(&fonts.latin)?,
        };
        debug!(devanagari = %fonts.devanagari.name, latin = %fonts.latin.name, "render context ready");
        Ok(Self {
            fonts,
            header,
            layout,
            loaded,
        })
    }

    /// Context that reads no font files. PDF output falls back to the
    /// built-in faces; for layout-only use.
    pub fn unchecked(fonts: FontSet, header: ReportHeader, layout: ReportLayout) -> Self {
        Self {
            fonts,
            header,
            layout,
            loaded: LoadedFonts::default(),
        }
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// Lay out the report for one computed case.
    pub fn render_case(&self, record: &CaseRecord, petitioner: Option<&Bank>) -> ReportDocument {
        let l = &self.layout;
        let mut canvas = Canvas::new(self);

        canvas.centered(l.page_height - 41.89, l.header_size, &self.header.tribunal);
        canvas.centered(l.page_height - 66.89, l.header_size, &self.header.subtitle);

        let date_text = record
            .document_date_bs
            .as_ref()
            .map(local_date)
            .unwrap_or_default();
        canvas.mixed(440.0, l.page_height - 91.89, l.body_size, "मिति: ");
        canvas.boxed(470.0, l.page_height - 96.89, 90.0, l.box_height);
        canvas.mixed(475.0, l.page_height - 90.89, l.body_size, &date_text);

        canvas.cursor = l.first_row_y;
        for row in report_rows(record, petitioner) {
            canvas.row(&row);
        }

        let document = ReportDocument {
            title: format!("मुद्दा विवरण- {}", record.case_number),
            file_name: format!("mudda_{}_report.pdf", record.case_number),
            page_width: l.page_width,
            page_height: l.page_height,
            pages: canvas.finish(),
        };
        debug!(
            case_number = %record.case_number,
            pages = document.pages.len(),
            "laid out report"
        );
        document
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::unchecked(FontSet::default(), ReportHeader::default(), ReportLayout::default())
    }
}

fn read_face(face: &FontFace) -> MuddaResult<Option<Vec<u8>>> {
    let Some(path) = &face.path else {
        return Ok(None);
    };
    fs::read(path).map(Some).map_err(|e| MuddaError::InvalidInput {
        field: "fonts".into(),
        reason: format!("font file for {} not readable at {}: {e}", face.name, path.display()),
    })
}

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        font: String,
        size: f32,
        text: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        centered: bool,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub number: usize,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    pub file_name: String,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    /// Every text run in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.elements.iter()).filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Rect { .. } => None,
        })
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ReportRow {
    Single {
        label: &'static str,
        value: String,
        wide: bool,
    },
    Pair {
        left_label: &'static str,
        left_value: String,
        right_label: &'static str,
        right_value: String,
    },
}

fn single(label: &'static str, value: String) -> ReportRow {
    ReportRow::Single {
        label,
        value,
        wide: false,
    }
}

fn pair(left_label: &'static str, left_value: String, right_label: &'static str, right_value: String) -> ReportRow {
    ReportRow::Pair {
        left_label,
        left_value,
        right_label,
        right_value,
    }
}

fn local_date(date: &BsDate) -> String {
    to_local_digits(&date.to_string())
}

fn local_percent(value: Decimal, dp: u32) -> String {
    let mut v = value.round_dp(dp);
    v.rescale(dp);
    format!("{}%", to_local_digits(&v.to_string()))
}

/// Field/value rows of the report, in print order.
pub fn report_rows(record: &CaseRecord, petitioner: Option<&Bank>) -> Vec<ReportRow> {
    let a = &record.amounts;
    vec![
        single("मुद्दा नम्बर", localize_case_number(&record.case_number)),
        ReportRow::Single {
            label: "वादी",
            value: petitioner.map(|b| b.name.clone()).unwrap_or_default(),
            wide: true,
        },
        single("प्रतिवादी", record.defendant.clone()),
        pair(
            "सावा रकम",
            format_local_money(record.principal_amount),
            "दाबी रकम",
            format_local_money(a.claimed_amount),
        ),
        pair(
            "साँवा गणना शुरु",
            local_date(&record.issue_date_bs),
            "अन्तिम मिति",
            local_date(&record.final_date_bs),
        ),
        single("कुल दिन", to_local_digits(&a.total_days.to_string())),
        pair(
            "ब्याज दर",
            local_percent(record.interest_rate, 2),
            "ब्याज रकम",
            format_local_money(a.interest_amount),
        ),
        single("कुल रकम", format_local_money(a.total_amount)),
        pair(
            "कर",
            local_percent(record.tax_rate.as_decimal() * Decimal::ONE_HUNDRED, 1),
            "राजस्व रकम",
            format_local_money(a.tax_revenue_amount),
        ),
        single("अगावै तिरेको रकम", format_local_money(record.prepaid_amount)),
        single("भुक्तानी गर्नुपर्ने रकम", format_local_money(a.payable_amount)),
        single("स्थिति", record.status.local_label().to_string()),
    ]
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

struct Canvas<'a> {
    ctx: &'a RenderContext,
    pages: Vec<Page>,
    current: Vec<Element>,
    cursor: f32,
}

impl<'a> Canvas<'a> {
    fn new(ctx: &'a RenderContext) -> Self {
        Self {
            ctx,
            pages: Vec::new(),
            current: Vec::new(),
            cursor: ctx.layout.first_row_y,
        }
    }

    fn width_of(&self, run: &ScriptRun, size: f32) -> f32 {
        let face = self.ctx.fonts.face(run.script);
        run.text.chars().count() as f32 * size * face.average_advance
    }

    fn centered(&mut self, y: f32, size: f32, text: &str) {
        self.current.push(Element::Text {
            x: self.ctx.layout.page_width / 2.0,
            y,
            font: self.ctx.fonts.devanagari.name.clone(),
            size,
            text: text.to_string(),
            centered: true,
        });
    }

    /// Draw `text` run by run, switching font at every script change.
    fn mixed(&mut self, x: f32, y: f32, size: f32, text: &str) {
        let mut cursor_x = x;
        for run in segment_scripts(text) {
            let width = self.width_of(&run, size);
            self.current.push(Element::Text {
                x: cursor_x,
                y,
                font: self.ctx.fonts.face(run.script).name.clone(),
                size,
                text: run.text,
                centered: false,
            });
            cursor_x += width;
        }
    }

    fn boxed(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.current.push(Element::Rect { x, y, width, height });
    }

    fn labelled(&mut self, label_x: f32, value_x: f32, box_width: f32, label: &str, value: &str) {
        let l = &self.ctx.layout;
        let (y, size, box_height) = (self.cursor, l.body_size, l.box_height);
        self.mixed(label_x, y, size, &format!("{label} :"));
        self.boxed(value_x, y - 5.0, box_width, box_height);
        self.mixed(value_x + 5.0, y + 1.0, size, value);
    }

    fn row(&mut self, row: &ReportRow) {
        let l = self.ctx.layout.clone();
        match row {
            ReportRow::Single { label, value, wide } => {
                let width = if *wide { l.wide_box_width } else { l.box_width };
                self.labelled(l.label_x, l.value_x, width, label, value);
            }
            ReportRow::Pair {
                left_label,
                left_value,
                right_label,
                right_value,
            } => {
                self.labelled(l.label_x, l.value_x, l.box_width, left_label, left_value);
                self.labelled(l.label2_x, l.value2_x, l.box_width, right_label, right_value);
            }
        }

        self.cursor -= l.line_height;
        if self.cursor < l.break_below {
            self.break_page();
            self.cursor = l.continuation_y;
        }
    }

    fn break_page(&mut self) {
        let elements = std::mem::take(&mut self.current);
        self.pages.push(Page {
            number: self.pages.len() + 1,
            elements,
        });
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        self.pages
    }
}
