//! HTML pages.
//!
//! Every value interpolated into a page goes through [`escape_html()`].

use crate::github::UserProfile;
use http::StatusCode;
use serde_json::Value;
use url::Url;

/// Wrap a page body in the common document structure.
fn layout(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }}
.button {{ display: inline-block; padding: .6rem 1.2rem; background: #24292f; color: #fff; border-radius: 6px; text-decoration: none; }}
.avatar {{ width: 96px; height: 96px; border-radius: 50%; }}
table {{ border-collapse: collapse; }}
th, td {{ text-align: left; padding: .25rem .75rem; border-bottom: 1px solid #ddd; vertical-align: top; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

/// The login page.
///
/// `authorize_url` is GitHub’s authorization endpoint with our `client_id`
/// already in the query string.
#[must_use]
pub fn index(authorize_url: &Url) -> String {
    let href = escape_html(authorize_url.as_str());
    layout(
        "Login with GitHub",
        &format!(
            r#"<h1>Login with GitHub</h1>
<p>Sign in to see your GitHub profile.</p>
<p><a class="button" href="{href}">Login with GitHub</a></p>"#
        ),
    )
}

/// The page shown after a successful login.
#[must_use]
pub fn dashboard(profile: &UserProfile) -> String {
    let login = escape_html(profile.login());
    let heading = profile.name().map_or_else(
        || login.clone(),
        |name| format!("{} ({login})", escape_html(name)),
    );

    let avatar = profile
        .avatar_url()
        .map(|url| {
            format!(
                r#"<img class="avatar" src="{}" alt="{login}’s avatar">"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let link = profile
        .html_url()
        .map(|url| {
            format!(
                r#"<p><a href="{}">View {login} on GitHub</a></p>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let rows: String = profile
        .fields()
        .map(|(key, value)| {
            format!(
                "<tr><th>{}</th><td>{}</td></tr>\n",
                escape_html(key),
                escape_html(&display_value(value)),
            )
        })
        .collect();

    layout(
        &format!("{} · GitHub profile", profile.login()),
        &format!(
            r#"{avatar}
<h1>{heading}</h1>
{link}
<table>
{rows}</table>
<p><a href="/">Log in again</a></p>"#
        ),
    )
}

/// A page explaining why a login failed.
#[must_use]
pub fn error(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let title = format!("{} {reason}", status.as_u16());
    layout(
        &title,
        &format!(
            r#"<h1>{}</h1>
<p>{}</p>
<p><a href="/">Back to login</a></p>"#,
            escape_html(&title),
            escape_html(message),
        ),
    )
}

/// Format a profile value for display.
///
/// Strings are shown as is, `null` as nothing, and everything else as
/// compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(string) => string.clone(),
        other => other.to_string(),
    }
}

/// Escape text for use in HTML content or a quoted attribute.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
