//! Server-rendered HTML building blocks.
//!
//! Pages are assembled from `format!` fragments around a shared layout.
//! Every interpolated user value goes through [`escape`].

use crate::config;

/// Escape a string for safe interpolation into HTML text or attributes.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap page content in the shared document shell with the top nav.
pub fn layout(title: &str, user: Option<&str>, flash: Option<&str>, body: &str) -> String {
    let account_nav = match user {
        Some(username) => format!(
            r#"<span class="nav-user">{}</span>
      <a href="/profile">Profile</a>
      <form method="post" action="/logout" class="inline"><button type="submit">Log out</button></form>"#,
            escape(username)
        ),
        None => r#"<a href="/login">Login</a>
      <a href="/register">Register</a>"#
            .to_string(),
    };
    let flash_banner = match flash {
        Some(message) => format!(r#"<div class="flash">{}</div>"#, escape(message)),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} | {app}</title>
  <style>
    body {{ font-family: system-ui, sans-serif; margin: 0; color: #1c2733; }}
    nav {{ background: #134e6f; color: #fff; padding: 0.75rem 1.5rem; display: flex; gap: 1rem; align-items: center; }}
    nav a {{ color: #e6f2f8; text-decoration: none; }}
    nav .brand {{ font-weight: 700; margin-right: auto; }}
    nav form.inline {{ display: inline; margin: 0; }}
    main {{ max-width: 56rem; margin: 1.5rem auto; padding: 0 1.5rem; }}
    .flash {{ background: #e2f4e4; border: 1px solid #9fd3a6; padding: 0.6rem 1rem; margin-bottom: 1rem; }}
    .errors {{ background: #fbe9e9; border: 1px solid #e3a0a0; padding: 0.6rem 1rem; margin-bottom: 1rem; }}
    table {{ border-collapse: collapse; width: 100%; }}
    th, td {{ border: 1px solid #cfd8df; padding: 0.45rem 0.7rem; text-align: left; }}
    label {{ display: block; margin-top: 0.7rem; }}
    input {{ padding: 0.35rem; width: 20rem; max-width: 100%; }}
    button {{ margin-top: 1rem; padding: 0.45rem 1.1rem; cursor: pointer; }}
  </style>
</head>
<body>
  <nav>
    <a class="brand" href="/">{app}</a>
    <a href="/patients">Patients</a>
    <a href="/doctors">Doctors</a>
    {account_nav}
  </nav>
  <main>
    {flash_banner}
    {body}
  </main>
</body>
</html>
"#,
        title = escape(title),
        app = config::APP_NAME,
    )
}

/// Render a validation error box, or nothing when the list is empty.
pub fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", escape(e)))
        .collect();
    format!(r#"<div class="errors"><ul>{items}</ul></div>"#)
}

/// A labelled form input with its current value preserved.
pub fn text_input(label: &str, name: &str, kind: &str, value: &str) -> String {
    format!(
        r#"<label>{label}
  <input type="{kind}" name="{name}" value="{value}">
</label>"#,
        label = escape(label),
        value = escape(value),
    )
}

/// Standalone error page (404 / 500).
pub fn error_page(title: &str, detail: &str) -> String {
    layout(
        title,
        None,
        None,
        &format!(
            "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to the home page</a></p>",
            escape(title),
            escape(detail)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(
            escape(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn layout_shows_login_links_when_anonymous() {
        let html = layout("Patients", None, None, "<p>hi</p>");
        assert!(html.contains(r#"<a href="/login">Login</a>"#));
        assert!(html.contains("<title>Patients | Wardbook</title>"));
    }

    #[test]
    fn layout_shows_username_when_logged_in() {
        let html = layout("Home", Some("amina"), None, "");
        assert!(html.contains("amina"));
        assert!(html.contains("/logout"));
        assert!(!html.contains(r#"<a href="/register">"#));
    }

    #[test]
    fn flash_banner_is_escaped() {
        let html = layout("Home", None, Some("<script>alert(1)</script>"), "");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn error_list_empty_renders_nothing() {
        assert_eq!(error_list(&[]), "");
        let html = error_list(&["This password is too common.".to_string()]);
        assert!(html.contains("<li>This password is too common.</li>"));
    }

    #[test]
    fn text_input_preserves_value() {
        let html = text_input("First name", "first_name", "text", "Jane");
        assert!(html.contains(r#"name="first_name""#));
        assert!(html.contains(r#"value="Jane""#));
    }
}
