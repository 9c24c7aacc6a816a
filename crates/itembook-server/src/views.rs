//! HTML pages
//!
//! Every page is wrapped in [`layout`], which also shows the pending flash.
//! Any text that came from a user goes through [`escape_html`].

use itembook_core::{Item, ItemId, TITLE_MAX_LEN};

use crate::flash::Flash;
use crate::form::FormValues;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
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

fn layout(title: &str, flash: Option<&Flash>, content: &str) -> String {
    let flash_html = flash
        .map(|f| {
            format!(
                "<div class=\"flash flash-{}\" role=\"status\">{}</div>\n",
                f.level.as_str(),
                escape_html(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Itembook</title>
</head>
<body>
<header><a href="/">Itembook</a></header>
<main>
{flash_html}{content}</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Listing page (`GET /`)
pub fn index(items: &[Item], flash: Option<&Flash>) -> String {
    let mut content =
        String::from("<h1>Items</h1>\n<p><a href=\"/create\">Create new item</a></p>\n");

    if items.is_empty() {
        content.push_str("<p class=\"empty\">No items yet.</p>\n");
    } else {
        content.push_str(
            "<table>\n<thead><tr><th>Title</th><th>Description</th><th>Created</th><th></th></tr></thead>\n<tbody>\n",
        );
        for item in items {
            content.push_str(&format!(
                "<tr id=\"item-{id}\"><td>{title}</td><td>{description}</td><td>{created}</td>\
                 <td><a href=\"/edit/{id}\">Edit</a> <a href=\"/delete/{id}\">Delete</a></td></tr>\n",
                id = item.id,
                title = escape_html(&item.title),
                description = escape_html(item.description.as_deref().unwrap_or("")),
                created = item.created_at.format("%Y-%m-%d %H:%M"),
            ));
        }
        content.push_str("</tbody>\n</table>\n");
    }

    layout("Items", flash, &content)
}

fn item_form(action: &str, submit: &str, values: &FormValues, error: Option<&str>) -> String {
    let error_html = error
        .map(|e| format!("<p class=\"error\" role=\"alert\">{}</p>\n", escape_html(e)))
        .unwrap_or_default();

    format!(
        r#"{error_html}<form method="post" action="{action}">
<label for="title">Title</label>
<input type="text" id="title" name="title" maxlength="{max}" required value="{title}">
<label for="description">Description</label>
<textarea id="description" name="description">{description}</textarea>
<button type="submit">{submit}</button>
<a href="/">Cancel</a>
</form>
"#,
        max = TITLE_MAX_LEN,
        title = escape_html(&values.title),
        description = escape_html(&values.description),
    )
}

/// Create form (`GET /create`, or a rejected `POST /create`)
pub fn create_form(values: &FormValues, error: Option<&str>, flash: Option<&Flash>) -> String {
    let content = format!(
        "<h1>Create item</h1>\n{}",
        item_form("/create", "Create", values, error)
    );
    layout("Create item", flash, &content)
}

/// Edit form for an existing item
pub fn edit_form(
    id: ItemId,
    values: &FormValues,
    error: Option<&str>,
    flash: Option<&Flash>,
) -> String {
    let content = format!(
        "<h1>Edit item</h1>\n{}",
        item_form(&format!("/edit/{}", id), "Save", values, error)
    );
    layout("Edit item", flash, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(id: ItemId, title: &str, description: Option<&str>) -> Item {
        Item {
            id,
            title: title.into(),
            description: description.map(Into::into),
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_index_lists_items_with_links() {
        let html = index(&[item(1, "Buy milk", Some("2%")), item(2, "Walk dog", None)], None);
        assert!(html.contains("Buy milk"));
        assert!(html.contains("2%"));
        assert!(html.contains("2024-03-09 14:05"));
        assert!(html.contains("href=\"/edit/1\""));
        assert!(html.contains("href=\"/delete/2\""));
        assert!(!html.contains("No items yet."));
    }

    #[test]
    fn test_index_empty_state() {
        let html = index(&[], None);
        assert!(html.contains("No items yet."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = index(&[item(1, "<script>alert(1)</script>", None)], None);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_flash_rendered() {
        let flash = Flash::success("Created successfully!");
        let html = index(&[], Some(&flash));
        assert!(html.contains("flash-success"));
        assert!(html.contains("Created successfully!"));
    }

    #[test]
    fn test_edit_form_prefilled() {
        let values = FormValues::from(&item(4, "Say \"hi\"", Some("line one\nline two")));
        let html = edit_form(4, &values, None, None);
        assert!(html.contains("action=\"/edit/4\""));
        assert!(html.contains("value=\"Say &quot;hi&quot;\""));
        assert!(html.contains(">line one\nline two</textarea>"));
    }

    #[test]
    fn test_create_form_shows_error() {
        let html = create_form(&FormValues::default(), Some("title must not be empty"), None);
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("title must not be empty"));
        assert!(html.contains("action=\"/create\""));
    }
}
