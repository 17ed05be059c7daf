//! Bilingual prescription PDF rendering.
//!
//! Layout is a single top-to-bottom pass over the prescription using printpdf's text
//! operators; [`layout::Pager`] decides when a new A4 page is needed. With a Unicode TTF
//! configured, labels are `Dari / English` and RTL lines are drawn right-aligned in visual
//! order. Without one, the built-in Helvetica fonts are used with English labels and any
//! character outside Latin-1 printed as `?`.

pub mod bidi;
pub mod layout;

use crate::config::{ClinicInfo, CoreConfig};
use crate::{PrescriptionError, PrescriptionResult};
use api_shared::dto::{Medicine, Prescription};
use layout::{
    chars_per_line, line_height_mm, text_width_mm, wrap_text, Pager, CONTENT_WIDTH_MM,
    FOOTER_Y_MM, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use std::io::BufWriter;

const TITLE_SIZE: f32 = 15.0;
const HEADING_SIZE: f32 = 11.5;
const BODY_SIZE: f32 = 10.0;
const SMALL_SIZE: f32 = 8.5;

/// `(dari, english)` label pairs.
type Label = (&'static str, &'static str);

const TITLE: Label = ("نسخه طبی", "Medical Prescription");
const NUMBER: Label = ("شماره", "No.");
const DATE: Label = ("تاریخ", "Date");
const PATIENT: Label = ("معلومات مریض", "Patient");
const NAME: Label = ("نام", "Name");
const AGE: Label = ("سن", "Age");
const GENDER: Label = ("جنسیت", "Gender");
const PHONE: Label = ("تلفن", "Phone");
const ADDRESS: Label = ("آدرس", "Address");
const VITALS: Label = ("علایم حیاتی", "Vital signs");
const BLOOD_PRESSURE: Label = ("فشار خون", "Blood pressure");
const PULSE_RATE: Label = ("نبض", "Pulse");
const TEMPERATURE: Label = ("حرارت", "Temperature");
const RESPIRATORY_RATE: Label = ("تنفس", "Respiratory rate");
const OXYGEN_SATURATION: Label = ("اشباع اکسیجن", "SpO2");
const WEIGHT: Label = ("وزن", "Weight");
const HEIGHT: Label = ("قد", "Height");
const CHIEF_COMPLAINT: Label = ("شکایت اصلی", "Chief complaint");
const PRESENT_ILLNESS: Label = ("تاریخچه مریضی فعلی", "History of present illness");
const PAST_HISTORY: Label = ("سوابق طبی", "Past medical history");
const ALLERGIES: Label = ("حساسیت ها", "Allergies");
const EXAMINATION: Label = ("معاینه فزیکی", "Physical examination");
const DIAGNOSIS: Label = ("تشخیص", "Diagnosis");
const TREATMENT_PLAN: Label = ("پلان تداوی", "Treatment plan");
const MEDICINES: Label = ("دواها", "Rx");
const NO_MEDICINES: Label = ("دوا تجویز نشده است", "No medicines prescribed");
const QUANTITY: Label = ("تعداد", "Qty");
const FOLLOW_UP: Label = ("مراجعه بعدی", "Follow-up");
const NOTES: Label = ("یادداشت", "Notes");
const DOCTOR: Label = ("داکتر", "Doctor");
const SIGNATURE: Label = ("امضا", "Signature");
const PAGE: Label = ("صفحه", "Page");

pub struct PdfRenderer {
    clinic: ClinicInfo,
    font: Option<Vec<u8>>,
}

impl PdfRenderer {
    /// `font` is the raw bytes of a TrueType font covering Arabic script.
    pub fn new(clinic: ClinicInfo, font: Option<Vec<u8>>) -> Self {
        Self { clinic, font }
    }

    /// Loads the configured font file, if any.
    pub fn from_config(cfg: &CoreConfig) -> PrescriptionResult<Self> {
        let font = match cfg.pdf_font_path() {
            Some(path) => {
                tracing::info!("using PDF font {}", path.display());
                Some(std::fs::read(path).map_err(PrescriptionError::FontRead)?)
            }
            None => None,
        };
        Ok(Self::new(cfg.clinic().clone(), font))
    }

    /// Renders `prescription` to PDF bytes.
    pub fn render(&self, prescription: &Prescription) -> PrescriptionResult<Vec<u8>> {
        self.render_pages(prescription).map(|(bytes, _)| bytes)
    }

    /// Renders and also reports the number of pages produced.
    pub fn render_pages(&self, prescription: &Prescription) -> PrescriptionResult<(Vec<u8>, usize)> {
        let mut canvas = Canvas::new(&prescription.prescription_number, self.font.as_deref())?;

        self.header(&mut canvas, prescription);
        patient_block(&mut canvas, prescription);
        vitals_block(&mut canvas, prescription);
        clinical_sections(&mut canvas, prescription);
        medicines_block(&mut canvas, &prescription.medicines);

        canvas.section(FOLLOW_UP, prescription.follow_up.as_deref());
        canvas.section(NOTES, prescription.notes.as_deref());
        signature_block(&mut canvas, prescription);

        canvas.finish()
    }

    fn header(&self, canvas: &mut Canvas, prescription: &Prescription) {
        canvas.text(self.clinic.name.as_str(), TITLE_SIZE, true);
        if let Some(address) = &self.clinic.address {
            canvas.text(address, SMALL_SIZE, false);
        }
        if let Some(phone) = &self.clinic.phone {
            let line = format!("{}: {phone}", canvas.label(PHONE));
            canvas.text(&line, SMALL_SIZE, false);
        }
        canvas.gap(3.0);
        let title = canvas.label(TITLE);
        canvas.text(&title, HEADING_SIZE + 1.0, true);
        let number = format!(
            "{}: {}    {}: {}",
            canvas.label(NUMBER),
            prescription.prescription_number,
            canvas.label(DATE),
            prescription.prescription_date
        );
        canvas.text(&number, BODY_SIZE, false);
        canvas.rule();
    }
}

fn patient_block(canvas: &mut Canvas, p: &Prescription) {
    canvas.heading(PATIENT);
    canvas.field(NAME, Some(p.patient_name.as_str()));
    let age = p.patient_age.map(|a| a.to_string());
    canvas.field(AGE, age.as_deref());
    canvas.field(GENDER, p.patient_gender.as_deref());
    canvas.field(PHONE, p.patient_phone.as_deref());
    canvas.field(ADDRESS, p.patient_address.as_deref());
}

fn vitals_block(canvas: &mut Canvas, p: &Prescription) {
    let v = &p.vitals;
    if v.is_empty() {
        return;
    }
    canvas.heading(VITALS);
    canvas.field(BLOOD_PRESSURE, v.blood_pressure.as_deref());
    canvas.field(PULSE_RATE, v.pulse_rate.as_deref());
    canvas.field(TEMPERATURE, v.temperature.as_deref());
    canvas.field(RESPIRATORY_RATE, v.respiratory_rate.as_deref());
    canvas.field(OXYGEN_SATURATION, v.oxygen_saturation.as_deref());
    canvas.field(WEIGHT, v.weight.as_deref());
    canvas.field(HEIGHT, v.height.as_deref());
}

fn clinical_sections(canvas: &mut Canvas, p: &Prescription) {
    canvas.section(CHIEF_COMPLAINT, p.chief_complaint.as_deref());
    canvas.section(PRESENT_ILLNESS, p.history_of_present_illness.as_deref());
    canvas.section(PAST_HISTORY, p.past_medical_history.as_deref());
    canvas.section(ALLERGIES, p.allergies.as_deref());
    canvas.section(EXAMINATION, p.physical_examination.as_deref());
    canvas.section(DIAGNOSIS, Some(p.diagnosis.as_str()));
    canvas.section(TREATMENT_PLAN, p.treatment_plan.as_deref());
}

fn medicines_block(canvas: &mut Canvas, medicines: &[Medicine]) {
    canvas.heading(MEDICINES);
    if medicines.is_empty() {
        let none = canvas.label(NO_MEDICINES);
        canvas.text(&none, BODY_SIZE, false);
        return;
    }

    for (i, m) in medicines.iter().enumerate() {
        let mut first = format!("{}. {}", i + 1, m.name);
        if let Some(dosage) = &m.dosage {
            first.push_str(&format!("  {dosage}"));
        }
        canvas.text(&first, BODY_SIZE, true);

        let quantity = m
            .quantity
            .as_ref()
            .map(|q| format!("{}: {q}", canvas.label(QUANTITY)));
        let details: Vec<&str> = [
            m.frequency.as_deref(),
            m.duration.as_deref(),
            m.route.as_deref(),
            quantity.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            canvas.indented(&details.join(" | "), BODY_SIZE);
        }
        if let Some(instructions) = &m.instructions {
            canvas.indented(instructions, SMALL_SIZE + 0.5);
        }
        canvas.gap(1.5);
    }
}

fn signature_block(canvas: &mut Canvas, p: &Prescription) {
    canvas.gap(8.0);
    if let Some(doctor) = &p.doctor_name {
        let line = format!("{}: {doctor}", canvas.label(DOCTOR));
        canvas.text(&line, BODY_SIZE, true);
    }
    let line = format!("{}: ______________________", canvas.label(SIGNATURE));
    canvas.text(&line, BODY_SIZE, false);
}

/// Drawing state for one document.
struct Canvas {
    doc: PdfDocumentReference,
    layers: Vec<PdfLayerReference>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    unicode: bool,
    pager: Pager,
}

impl Canvas {
    fn new(title: &str, font: Option<&[u8]>) -> PrescriptionResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let first = doc.get_page(page).get_layer(layer);

        let (regular, bold) = match font {
            Some(bytes) => {
                let f = doc
                    .add_external_font(bytes)
                    .map_err(|e| PrescriptionError::Pdf(format!("font error: {e}")))?;
                (f.clone(), f)
            }
            None => (
                doc.add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(|e| PrescriptionError::Pdf(format!("font error: {e}")))?,
                doc.add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(|e| PrescriptionError::Pdf(format!("font error: {e}")))?,
            ),
        };

        Ok(Self {
            doc,
            layers: vec![first],
            regular,
            bold,
            unicode: font.is_some(),
            pager: Pager::new(),
        })
    }

    fn label(&self, (dari, english): Label) -> String {
        if self.unicode {
            format!("{dari} / {english}")
        } else {
            english.to_string()
        }
    }

    fn current_layer(&mut self) -> PdfLayerReference {
        if self.layers.len() < self.pager.page() {
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", self.pager.page()),
            );
            self.layers.push(self.doc.get_page(page).get_layer(layer));
        }
        // The vector always holds at least the first page.
        self.layers[self.layers.len() - 1].clone()
    }

    fn draw_line(&mut self, line: &str, size: f32, bold: bool, indent: f32) {
        let y = self.pager.reserve(line_height_mm(size));
        let layer = self.current_layer();
        let font = if bold { &self.bold } else { &self.regular };

        if self.unicode && bidi::contains_rtl(line) {
            let visual = bidi::visual_order(line);
            let right = PAGE_WIDTH_MM - MARGIN_MM - indent;
            let x = (right - text_width_mm(&visual, size)).max(MARGIN_MM);
            layer.use_text(visual, size, Mm(x), Mm(y), font);
        } else {
            let text = if self.unicode {
                line.to_string()
            } else {
                bidi::latin1_lossy(line)
            };
            layer.use_text(text, size, Mm(MARGIN_MM + indent), Mm(y), font);
        }
    }

    fn wrapped(&mut self, text: &str, size: f32, bold: bool, indent: f32) {
        let width = chars_per_line(size, CONTENT_WIDTH_MM - indent);
        for line in wrap_text(text, width) {
            self.draw_line(&line, size, bold, indent);
        }
    }

    fn text(&mut self, text: &str, size: f32, bold: bool) {
        self.wrapped(text, size, bold, 0.0);
    }

    fn indented(&mut self, text: &str, size: f32) {
        self.wrapped(text, size, false, 6.0);
    }

    fn gap(&mut self, mm: f32) {
        self.pager.gap(mm);
    }

    fn rule(&mut self) {
        let dashes = "-".repeat(chars_per_line(BODY_SIZE, CONTENT_WIDTH_MM));
        self.draw_line(&dashes, BODY_SIZE, false, 0.0);
    }

    fn heading(&mut self, label: Label) {
        self.gap(3.0);
        let text = self.label(label);
        self.text(&text, HEADING_SIZE, true);
    }

    /// `label: value` on one line; absent values draw nothing.
    fn field(&mut self, label: Label, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            let line = format!("{}: {value}", self.label(label));
            self.text(&line, BODY_SIZE, false);
        }
    }

    /// Heading followed by a wrapped paragraph; absent values draw nothing.
    fn section(&mut self, label: Label, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.heading(label);
            self.text(value, BODY_SIZE, false);
        }
    }

    fn finish(self) -> PrescriptionResult<(Vec<u8>, usize)> {
        let total = self.layers.len();
        let page_label = self.label(PAGE);
        for (i, layer) in self.layers.iter().enumerate() {
            let footer = format!("{page_label} {} / {total}", i + 1);
            let footer = if self.unicode {
                bidi::visual_order(&footer)
            } else {
                footer
            };
            let x = (PAGE_WIDTH_MM - text_width_mm(&footer, SMALL_SIZE)) / 2.0;
            layer.use_text(footer, SMALL_SIZE, Mm(x), Mm(FOOTER_Y_MM), &self.regular);
        }

        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| PrescriptionError::Pdf(format!("save error: {e}")))?;
        let bytes = buf
            .into_inner()
            .map_err(|e| PrescriptionError::Pdf(format!("buffer error: {e}")))?;
        Ok((bytes, total))
    }
}
