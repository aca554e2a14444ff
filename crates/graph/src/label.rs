use crate::config::{DiagramConfig, ScanConfig};
use crate::style::Rgb;
use crate::types::{modifiers_str, RoutineInfo, TagUse, TypeKind, TypeRecord};
use std::fmt::Write;

/// Parameter lists wrap onto a new row past this many columns
pub const PARAM_WRAP_WIDTH: usize = 40;

const PARAM_ROW_BREAK: &str = "</td></tr><tr><td></td><td></td><td align='left' valign='top'>";

/// Append `text` to `buf` with HTML entities escaped
pub fn html_encode(text: &str, buf: &mut String) {
    for c in text.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\'' => buf.push_str("&#39;"),
            c if c.is_ascii() && !c.is_ascii_control() => buf.push(c),
            c => {
                let _ = write!(buf, "&#{};", u32::from(c));
            }
        }
    }
}

fn kind_keyword(record: &TypeRecord) -> &'static str {
    match record.kind {
        TypeKind::Standard if record.is_enum => "enum",
        TypeKind::Standard => "class",
        TypeKind::Interface => "interface",
        TypeKind::Tag => "@interface",
    }
}

/// Space-joined display strings of a tag set
fn tags_str(tags: &[TagUse]) -> String {
    tags.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn section_header(title: &str, header_bg: Rgb, buf: &mut String) {
    let _ = write!(
        buf,
        "<tr><td colspan='3' bgcolor='{header_bg}'><font point-size='12'><b>{title}</b></font></td></tr>"
    );
}

/// Renders the HTML-like label of one node
pub struct LabelRenderer<'a> {
    pub scan: &'a ScanConfig,
    pub diagram: &'a DiagramConfig,
}

impl LabelRenderer<'_> {
    /// Label body, including the surrounding `<` `>`
    pub fn render(&self, record: &TypeRecord, header_bg: Rgb, buf: &mut String) {
        buf.push('<');
        buf.push_str("<table border='0' cellborder='0' cellspacing='1'>");

        // Modifiers and kind
        let modifiers = modifiers_str(&record.modifiers);
        buf.push_str("<tr><td>");
        if !modifiers.is_empty() {
            buf.push_str(&modifiers);
            buf.push(' ');
        }
        buf.push_str(kind_keyword(record));
        buf.push_str("</td></tr>");

        if let Some(package) = record.package_name() {
            buf.push_str("<tr><td><b>");
            html_encode(package, buf);
            buf.push_str("</b></td></tr>");
        }

        buf.push_str("<tr><td><font point-size='24'><b>");
        html_encode(record.simple_name(), buf);
        buf.push_str("</b></font></td></tr>");

        if !record.tags.is_empty() {
            section_header("TAGS", header_bg, buf);
            let mut tags: Vec<_> = record.tags.iter().collect();
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            for tag in tags {
                buf.push_str("<tr><td align='center' valign='top'>");
                html_encode(&tag.to_string(), buf);
                buf.push_str("</td></tr>");
            }
        }

        if self.diagram.show_attributes && !record.attributes.is_empty() {
            self.attributes(record, header_bg, buf);
        }

        if self.diagram.show_routines && record.routines.iter().any(|r| !r.is_static_initializer()) {
            self.routines(record, header_bg, buf);
        }

        buf.push_str("</table>");
        buf.push('>');
    }

    fn attributes(&self, record: &TypeRecord, header_bg: Rgb, buf: &mut String) {
        let show_modifiers = !self.scan.ignore_attribute_visibility;

        buf.push_str("<tr><td cellpadding='0'>");
        buf.push_str("<table border='0' cellborder='0'>");
        section_header(
            if show_modifiers { "PUBLIC ATTRIBUTES" } else { "ATTRIBUTES" },
            header_bg,
            buf,
        );

        let mut attributes: Vec<_> = record.attributes.iter().collect();
        attributes.sort_by(|a, b| a.name.cmp(&b.name));
        for attribute in attributes {
            let mut prefix = vec![tags_str(&attribute.tags)];
            if show_modifiers {
                prefix.push(modifiers_str(&attribute.modifiers));
            }
            prefix.push(attribute.type_ref.to_string());

            buf.push_str("<tr><td align='right' valign='top'>");
            html_encode(&join_non_empty(&prefix), buf);
            buf.push_str("</td><td align='left' valign='top'><b>");
            html_encode(&attribute.name, buf);
            buf.push_str("</b></td></tr>");
        }

        buf.push_str("</table>");
        buf.push_str("</td></tr>");
    }

    fn routines(&self, record: &TypeRecord, header_bg: Rgb, buf: &mut String) {
        let show_modifiers = !self.scan.ignore_routine_visibility;

        buf.push_str("<tr><td cellpadding='0'>");
        buf.push_str("<table border='0' cellborder='0'>");
        section_header(
            if show_modifiers { "PUBLIC ROUTINES" } else { "ROUTINES" },
            header_bg,
            buf,
        );

        let mut routines: Vec<_> = record
            .routines
            .iter()
            .filter(|r| !r.is_static_initializer())
            .collect();
        routines.sort_by(|a, b| a.name.cmp(&b.name));
        for routine in routines {
            let mut prefix = vec![tags_str(&routine.tags)];
            if show_modifiers {
                prefix.push(modifiers_str(&routine.modifiers));
            }

            buf.push_str("<tr><td align='right' valign='top'>");
            html_encode(&join_non_empty(&prefix), buf);
            if !buf.ends_with('>') {
                buf.push(' ');
            }
            if routine.is_constructor() {
                buf.push_str("<b>&lt;constructor&gt;</b>");
            } else {
                html_encode(routine.result_type.as_str(), buf);
            }
            buf.push_str("</td>");

            buf.push_str("<td align='left' valign='top'><b>");
            if routine.is_constructor() {
                html_encode(record.simple_name(), buf);
            } else {
                html_encode(&routine.name, buf);
            }
            buf.push_str("</b>&nbsp;</td>");

            buf.push_str("<td align='left' valign='top'>");
            parameters(routine, buf);
            buf.push_str("</td></tr>");
        }

        buf.push_str("</table>");
        buf.push_str("</td></tr>");
    }
}

fn join_non_empty(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parenthesized parameter list, wrapped at [`PARAM_WRAP_WIDTH`]
fn parameters(routine: &RoutineInfo, buf: &mut String) {
    buf.push('(');
    let mut wrap_pos = 0;
    for (i, param) in routine.parameters.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
            wrap_pos += 2;
        }
        if wrap_pos > PARAM_WRAP_WIDTH {
            buf.push_str(PARAM_ROW_BREAK);
            wrap_pos = 0;
        }

        for tag in &param.tags {
            let tag = tag.to_string();
            html_encode(&tag, buf);
            buf.push(' ');
            wrap_pos += tag.chars().count() + 1;
            if wrap_pos > PARAM_WRAP_WIDTH {
                buf.push_str(PARAM_ROW_BREAK);
                wrap_pos = 0;
            }
        }

        let type_str = param.type_ref.as_str();
        html_encode(type_str, buf);
        wrap_pos += type_str.chars().count();

        if let Some(name) = &param.name {
            buf.push_str(" <b>");
            html_encode(name, buf);
            buf.push_str("</b>");
            wrap_pos += 1 + name.chars().count();
        }
    }
    buf.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttributeInfo, Modifier, ParameterInfo};

    fn render(record: &TypeRecord, scan: &ScanConfig) -> String {
        let diagram = DiagramConfig::default();
        let renderer = LabelRenderer {
            scan,
            diagram: &diagram,
        };
        let mut buf = String::new();
        renderer.render(record, Rgb(0, 0, 0), &mut buf);
        buf
    }

    #[test]
    fn test_html_encode() {
        let mut buf = String::new();
        html_encode("List<Map<K, V>> & \"x\" é", &mut buf);
        assert_eq!(buf, "List&lt;Map&lt;K, V&gt;&gt; &amp; &quot;x&quot; &#233;");
    }

    #[test]
    fn test_header_package_and_name() {
        let record = TypeRecord::standard("com.acme.Color")
            .enumeration()
            .modifier(Modifier::Final)
            .modifier(Modifier::Public);
        let label = render(&record, &ScanConfig::default());
        assert!(label.starts_with("<<table"));
        assert!(label.ends_with("</table>>"));
        assert!(label.contains("<tr><td>public final enum</td></tr>"));
        assert!(label.contains("<tr><td><b>com.acme.</b></td></tr>"));
        assert!(label.contains("<font point-size='24'><b>Color</b></font>"));

        let tag = render(&TypeRecord::tag_type("Pet"), &ScanConfig::default());
        assert!(tag.contains("<tr><td>@interface</td></tr>"));
        assert!(!tag.contains("<tr><td><b>"));
    }

    #[test]
    fn test_attributes_sorted_with_modifiers() {
        let record = TypeRecord::standard("a.Box")
            .attribute(AttributeInfo::new("width", "int").modifier(Modifier::Public))
            .attribute(
                AttributeInfo::new("content", "java.util.List<a.Item>")
                    .modifier(Modifier::Public)
                    .tag(TagUse::new("NonNull")),
            );
        let label = render(&record, &ScanConfig::default());

        assert!(label.contains("<b>PUBLIC ATTRIBUTES</b>"));
        let content = label.find("<b>content</b>").unwrap();
        let width = label.find("<b>width</b>").unwrap();
        assert!(content < width);
        assert!(label.contains("@NonNull public java.util.List&lt;a.Item&gt;</td>"));

        let scan = ScanConfig {
            ignore_attribute_visibility: true,
            ..Default::default()
        };
        let label = render(&record, &scan);
        assert!(label.contains("<b>ATTRIBUTES</b>"));
        assert!(!label.contains("public int"));
    }

    #[test]
    fn test_constructor_and_static_initializer() {
        let record = TypeRecord::standard("a.Widget")
            .routine(RoutineInfo::new("<clinit>", "void"))
            .routine(RoutineInfo::constructor().param(ParameterInfo::new("int").named("size")))
            .routine(RoutineInfo::new("size", "int").modifier(Modifier::Public));
        let label = render(&record, &ScanConfig::default());

        assert!(!label.contains("clinit"));
        assert!(label.contains("<b>&lt;constructor&gt;</b></td>"));
        assert!(label.contains("<b>Widget</b>&nbsp;</td><td align='left' valign='top'>(int <b>size</b>)"));
        assert!(label.contains("public int</td>"));
    }

    #[test]
    fn test_only_static_initializer_means_no_routine_section() {
        let record = TypeRecord::standard("a.Holder").routine(RoutineInfo::new("<clinit>", "void"));
        let label = render(&record, &ScanConfig::default());
        assert!(!label.contains("ROUTINES"));
    }

    #[test]
    fn test_parameters_wrap() {
        let routine = RoutineInfo::new("configure", "void")
            .param(ParameterInfo::new("java.lang.String").named("firstName"))
            .param(ParameterInfo::new("java.lang.String").named("lastName"))
            .param(ParameterInfo::new("int").named("age"));
        let mut buf = String::new();
        parameters(&routine, &mut buf);

        // 26, then 2 + 25 = 53, then 2 more = 55 > 40 -> break before "int"
        assert_eq!(buf.matches(PARAM_ROW_BREAK).count(), 1);
        let wrapped = buf.find(PARAM_ROW_BREAK).unwrap();
        let age = buf.find("int <b>age</b>").unwrap();
        assert!(wrapped < age);
        assert!(buf.starts_with("(java.lang.String <b>firstName</b>, "));
        assert!(buf.ends_with(")"));
    }

    #[test]
    fn test_short_parameters_do_not_wrap() {
        let routine = RoutineInfo::new("add", "int")
            .param(ParameterInfo::new("int").named("a").tag(TagUse::new("Min")))
            .param(ParameterInfo::new("int"));
        let mut buf = String::new();
        parameters(&routine, &mut buf);
        assert_eq!(buf, "(@Min int <b>a</b>, int)");
    }
}
