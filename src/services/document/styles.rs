//! Print stylesheet shared by every page type.

use crate::services::assets::FontFaces;

const FONT_STACK: &str = "'Sarabun', 'TH Sarabun New', 'Noto Sans Thai', sans-serif";

/// `<style>` block for one document, embedding the fonts when available.
pub fn stylesheet(fonts: Option<&FontFaces>) -> String {
    let mut css = String::with_capacity(8 * 1024);
    css.push_str("<style>\n");

    if let Some(fonts) = fonts {
        for (data, weight) in [(&fonts.regular, 400), (&fonts.bold, 700)] {
            css.push_str(&format!(
                "@font-face {{ font-family: 'Sarabun'; \
                 src: url(data:font/ttf;base64,{}) format('truetype'); \
                 font-weight: {}; font-style: normal; }}\n",
                data, weight
            ));
        }
    }

    css.push_str(&format!(
        "body {{ font-family: {}; margin: 0; padding: 0; \
         -webkit-print-color-adjust: exact; print-color-adjust: exact; }}\n",
        FONT_STACK
    ));
    css.push_str(PAGE_CSS);
    css.push_str("</style>\n");
    css
}

// A4 with renderer margins at zero; each .page carries its own padding.
// Height is 296mm so rounding never spills onto an extra sheet. Table pages
// may grow instead of clipping if their rows wrap more than expected.
const PAGE_CSS: &str = r#"
@page { size: A4; margin: 0; }
.page {
  width: 210mm; height: 296mm; position: relative; overflow: hidden;
  padding: 20mm; box-sizing: border-box; page-break-after: always;
}
.page:last-child { page-break-after: auto; }
.center { text-align: center; }
.bold { font-weight: bold; }

.cover-logo { display: block; margin: 0 auto; max-height: 35mm; }
.cover-title { font-size: 28pt; font-weight: bold; margin-top: 40px; }
.cover-subtitle { font-size: 24pt; font-weight: bold; margin-top: 15px; }
.cover-label { font-size: 20pt; margin-top: 60px; }
.cover-name { font-size: 32pt; font-weight: bold; margin-top: 30px; color: #000; }
.cover-info { font-size: 24pt; margin-top: 30px; }
.cover-dept { font-size: 24pt; margin-top: 15px; }
.cover-footer {
  font-size: 20pt; position: absolute; bottom: 40mm; left: 0; width: 100%;
  text-align: center; line-height: 1.5;
}

.table-title { font-size: 24pt; font-weight: bold; margin-top: 10px; }
.table-subtitle { font-size: 22pt; margin-top: 5px; }
.continued { font-size: 20pt; margin-top: 10px; }
.header-info { font-size: 20pt; margin: 20px 0; }
.header-row { display: flex; justify-content: space-between; }
.page.attendance, .page.summary { height: auto; min-height: 296mm; overflow: visible; }
table { width: 100%; border-collapse: collapse; font-size: 16pt; }
thead { display: table-header-group; }
tr { page-break-inside: avoid; break-inside: avoid; }
th, td { border: 1px solid #000; padding: 8px; vertical-align: top; }
th { background-color: #f0f0f0; text-align: center; font-weight: bold; }
.date { font-size: 14pt; color: #666; }
table.summary td { font-size: 12pt; }

.photo-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; margin-top: 30px; }
.photo-grid.six { gap: 12px; margin-top: 20px; }
.photo-item { display: flex; flex-direction: column; align-items: center; }
.photo-img-box {
  width: 320px; height: 240px; border: 1px solid #000; overflow: hidden;
  display: flex; justify-content: center; align-items: center;
}
.six .photo-img-box { width: 300px; height: 200px; }
.photo-img { width: 100%; height: 100%; object-fit: cover; }
.photo-caption { margin-top: 10px; font-size: 16pt; text-align: center; }
.six .photo-caption { margin-top: 6px; font-size: 14pt; }
"#;
