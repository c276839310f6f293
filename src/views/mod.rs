pub mod auth;
pub mod profile;

use std::fmt::Write;

use validator::ValidationErrors;

use crate::flash::Notice;
use crate::validation::{field_message, FieldDescriptor, FormValues, Widget};

const STYLE: &str = "body{font-family:sans-serif;background:#f3f4f6;margin:0;padding:3rem 1rem}\
main{max-width:36rem;margin:0 auto;background:#fff;border-radius:1rem;padding:2rem;box-shadow:0 4px 16px #0002}\
h2{text-align:center}label{display:block;font-size:.9rem;margin-top:.8rem}\
input,select{width:100%;padding:.5rem;box-sizing:border-box}input[type=checkbox]{width:auto}\
button,.button{margin-top:1rem;padding:.5rem 1rem;border:0;border-radius:.4rem;background:#4f46e5;color:#fff;text-decoration:none;display:inline-block;cursor:pointer}\
button.link{background:none;color:#4f46e5;padding:0;margin:0;text-decoration:underline}\
.field-error,.inline-error{color:#dc2626;font-size:.85rem}.verified{color:#16a34a}\
.notice{padding:.6rem 1rem;border-radius:.4rem;margin-bottom:1rem}\
.notice-success{background:#dcfce7}.notice-info{background:#dbeafe}.notice-error{background:#fee2e2}";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn layout(title: &str, notice: Option<&Notice>, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} | JourneyCraft</title><style>{}</style></head>\
         <body><main>{}{}</main></body></html>",
        escape(title),
        STYLE,
        notice.map(notice_banner).unwrap_or_default(),
        body
    )
}

fn notice_banner(notice: &Notice) -> String {
    format!(
        "<div class=\"notice notice-{}\" role=\"status\">{}</div>",
        notice.level.as_str(),
        escape(&notice.text)
    )
}

pub fn inline_error(message: &str) -> String {
    format!("<p class=\"inline-error\">{}</p>", escape(message))
}

/// Label, input and error line for one field. Passwords are never echoed.
pub fn field(descriptor: &FieldDescriptor, values: &FormValues, errors: Option<&ValidationErrors>) -> String {
    let name = descriptor.name;
    let value = escape(values.get(name));
    let mut html = format!("<label for=\"{name}\">{}</label>", escape(descriptor.label));

    let _ = match descriptor.widget {
        Widget::Checkbox => write!(
            html,
            "<input id=\"{name}\" name=\"{name}\" type=\"checkbox\"{}>",
            if values.is_checked(name) { " checked" } else { "" }
        ),
        Widget::Select(choices) => {
            let selected = values.trimmed(name);
            let mut options = format!(
                "<option value=\"\" disabled{}>Select {}</option>",
                if selected.is_empty() { " selected" } else { "" },
                escape(descriptor.label)
            );
            for choice in choices {
                let _ = write!(
                    options,
                    "<option value=\"{}\"{}>{}</option>",
                    choice.value,
                    if choice.value == selected { " selected" } else { "" },
                    escape(choice.label)
                );
            }
            write!(html, "<select id=\"{name}\" name=\"{name}\">{options}</select>")
        }
        Widget::Password => write!(html, "<input id=\"{name}\" name=\"{name}\" type=\"password\">"),
        widget => write!(
            html,
            "<input id=\"{name}\" name=\"{name}\" type=\"{}\"{} value=\"{value}\" placeholder=\"Enter your {}\">",
            input_type(widget),
            if widget == Widget::Number { " step=\"any\"" } else { "" },
            escape(&descriptor.label.to_lowercase())
        ),
    };

    if let Some(message) = errors.and_then(|e| field_message(e, name)) {
        let _ = write!(html, "<div class=\"field-error\">{}</div>", escape(&message));
    }
    html
}

fn input_type(widget: Widget) -> &'static str {
    match widget {
        Widget::Email => "email",
        Widget::Password => "password",
        Widget::Number => "number",
        Widget::Url => "url",
        Widget::Time => "time",
        Widget::Checkbox => "checkbox",
        Widget::Text | Widget::Select(_) => "text",
    }
}

pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        None,
        &format!("<h2>Error</h2>{}<a class=\"button\" href=\"/\">Back</a>", inline_error(message)),
    )
}
