use std::io::Cursor;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
};
use tracing::debug;

use super::{Element, FontFace, Page, RenderContext, ReportDocument};
use crate::{MuddaError, MuddaResult};

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

/// One face registered with the document being written.
struct Face {
    font: IndirectFontRef,
    builtin: bool,
    average_advance: f32,
}

impl RenderContext {
    /// Paint a laid-out report into PDF bytes, one PDF page per [`Page`].
    pub fn to_pdf(&self, document: &ReportDocument) -> MuddaResult<Vec<u8>> {
        let (width, height) = (mm(document.page_width), mm(document.page_height));
        let (doc, first_page, first_layer) = PdfDocument::new(&document.title, width, height, "Layer 1");

        let devanagari = register(&doc, &self.fonts.devanagari, self.loaded.devanagari.as_deref())?;
        let latin = register(&doc, &self.fonts.latin, self.loaded.latin.as_deref())?;

        let face_for = |name: &str| {
            if name == self.fonts.devanagari.name {
                &devanagari
            } else {
                &latin
            }
        };

        for (index, page) in document.pages.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_index, layer_index) = doc.add_page(width, height, "Layer 1");
                doc.get_page(page_index).get_layer(layer_index)
            };
            paint(&layer, page, &face_for);
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| MuddaError::Render(format!("{e:?}")))?;
        debug!(
            file_name = %document.file_name,
            pages = document.pages.len(),
            bytes = bytes.len(),
            "wrote report pdf"
        );
        Ok(bytes)
    }
}

fn register(doc: &PdfDocumentReference, face: &FontFace, data: Option<&[u8]>) -> MuddaResult<Face> {
    let (font, builtin) = match data {
        Some(bytes) => {
            let font = doc
                .add_external_font(Cursor::new(bytes))
                .map_err(|e| MuddaError::Render(format!("font {}: {e:?}", face.name)))?;
            (font, false)
        }
        None => {
            let font = doc
                .add_builtin_font(builtin_for(&face.name))
                .map_err(|e| MuddaError::Render(format!("font {}: {e:?}", face.name)))?;
            (font, true)
        }
    };
    Ok(Face {
        font,
        builtin,
        average_advance: face.average_advance,
    })
}

fn builtin_for(name: &str) -> BuiltinFont {
    match name {
        "Times-Roman" | "TimesRoman" => BuiltinFont::TimesRoman,
        "Courier" => BuiltinFont::Courier,
        _ => BuiltinFont::Helvetica,
    }
}

fn paint<'a>(layer: &PdfLayerReference, page: &Page, face_for: impl Fn(&str) -> &'a Face) {
    for element in &page.elements {
        match element {
            Element::Text {
                x,
                y,
                font,
                size,
                text,
                centered,
            } => {
                let face = face_for(font);
                // Built-in faces only cover Latin-1
                let text: String = if face.builtin {
                    text.chars().filter(|c| (*c as u32) < 0x100).collect()
                } else {
                    text.clone()
                };
                if text.trim().is_empty() {
                    continue;
                }
                let x = if *centered {
                    x - text.chars().count() as f32 * size * face.average_advance / 2.0
                } else {
                    *x
                };
                layer.use_text(text, *size, mm(x), mm(*y), &face.font);
            }
            Element::Rect { x, y, width, height } => {
                let corners = [(*x, *y), (x + width, *y), (x + width, y + height), (*x, y + height)];
                layer.add_line(Line {
                    points: corners
                        .iter()
                        .map(|(px, py)| (Point::new(mm(*px), mm(*py)), false))
                        .collect(),
                    is_closed: true,
                });
            }
        }
    }
}
