//! Excel export as a `SpreadsheetML` 2003 workbook.
//!
//! Spreadsheet applications open the output directly. There is no import
//! counterpart.

use super::UTF8_BOM;
use crate::io::traits::KeywordEncoder;
use crate::models::Keyword;
use crate::Result;

/// Column headers, in field order.
const HEADERS: [&str; 8] = [
    "关键词",
    "分类",
    "深度",
    "描述",
    "示例",
    "相关词",
    "认知影响",
    "跨领域应用",
];

/// Separator for list fields.
const LIST_JOIN: &str = "; ";

const XML_HEAD: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
    "<?mso-application progid=\"Excel.Sheet\"?>\n",
    "<Workbook xmlns=\"urn:schemas-microsoft-com:office:spreadsheet\"\n",
    " xmlns:o=\"urn:schemas-microsoft-com:office:office\"\n",
    " xmlns:x=\"urn:schemas-microsoft-com:office:excel\"\n",
    " xmlns:ss=\"urn:schemas-microsoft-com:office:spreadsheet\"\n",
    " xmlns:html=\"http://www.w3.org/TR/REC-html40\">\n",
);

/// Excel-XML encoder.
#[derive(Debug, Clone)]
pub struct ExcelXmlCodec {
    sheet_name: String,
}

impl ExcelXmlCodec {
    /// Creates an encoder with the default worksheet name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sheet_name: "关键词列表".to_string(),
        }
    }

    /// Sets the worksheet name.
    #[must_use]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    fn push_row<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>) {
        out.push_str("   <Row>\n");
        for cell in cells {
            out.push_str("    <Cell><Data ss:Type=\"String\">");
            out.push_str(&escape_xml(cell));
            out.push_str("</Data></Cell>\n");
        }
        out.push_str("   </Row>\n");
    }
}

impl Default for ExcelXmlCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes the five XML special characters.
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

impl KeywordEncoder for ExcelXmlCodec {
    fn encode(&self, keywords: &[Keyword]) -> Result<String> {
        let mut out = String::new();
        out.push(UTF8_BOM);
        out.push_str(XML_HEAD);
        out.push_str(" <Worksheet ss:Name=\"");
        out.push_str(&escape_xml(&self.sheet_name));
        out.push_str("\">\n  <Table>\n");

        Self::push_row(&mut out, HEADERS);
        for k in keywords {
            Self::push_row(
                &mut out,
                [
                    k.term.as_str(),
                    k.category.as_str(),
                    k.depth.as_str(),
                    k.description.as_str(),
                    k.examples.join(LIST_JOIN).as_str(),
                    k.related.join(LIST_JOIN).as_str(),
                    k.cognitive_impact.as_str(),
                    k.cross_domains.join(LIST_JOIN).as_str(),
                ],
            );
        }

        out.push_str("  </Table>\n </Worksheet>\n</Workbook>\n");
        Ok(out)
    }
}
