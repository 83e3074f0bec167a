//! Server-rendered admin pages.
//!
//! Pages are plain strings built from live catalog data. Every value that
//! comes from the catalog or the filesystem goes through [`escape`].

use catalog::services::{CategoryView, FeaturedDetails, ImageView, PortfolioStats};

const BASE_STYLE: &str = "
    body { font-family: Arial, sans-serif; margin: 20px; background: #1a1a1a; color: white; }
    .container { max-width: 1200px; margin: 0 auto; }
    .header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 30px; }
    .btn { background: #4CAF50; color: white; padding: 10px 20px; text-decoration: none; border-radius: 4px; border: none; cursor: pointer; }
    .btn:hover { background: #45a049; }
    .btn-danger { background: #f44336; }
    .btn-danger:hover { background: #da190b; }
    .panel { background: #2a2a2a; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
    .muted { color: #ccc; }
";

const DASHBOARD_STYLE: &str = "
    .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 40px; }
    .stat-card { background: #2a2a2a; padding: 20px; border-radius: 8px; text-align: center; }
    .stat-number { font-size: 2em; font-weight: bold; color: #4CAF50; }
    .nav-links { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 20px; margin-top: 30px; }
    .nav-link { background: #333; padding: 20px; border-radius: 8px; text-decoration: none; color: white; text-align: center; }
    .nav-link:hover { background: #444; }
    .category-stat { display: flex; justify-content: space-between; padding: 5px 0; }
";

const GRID_STYLE: &str = "
    .image-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 20px; }
    .image-card { background: #2a2a2a; border-radius: 8px; overflow: hidden; }
    .image-card img { width: 100%; height: 150px; object-fit: cover; }
    .image-info { padding: 15px; }
    .image-title { font-weight: bold; margin-bottom: 5px; }
    .image-meta { font-size: 0.9em; color: #ccc; margin-bottom: 10px; }
    .no-images { text-align: center; padding: 40px; color: #666; }
    .current { border: 2px solid #4CAF50; }
    table.exif td { padding: 2px 12px 2px 0; }
";

const CATEGORY_STYLE: &str = "
    .category-list { background: #2a2a2a; border-radius: 8px; overflow: hidden; }
    .category-item { padding: 20px; border-bottom: 1px solid #333; display: flex; justify-content: space-between; align-items: center; }
    .category-item:last-child { border-bottom: none; }
    .category-info h3 { margin: 0 0 5px 0; }
    .image-count { background: #666; padding: 4px 12px; border-radius: 20px; font-size: 0.9em; margin-right: 10px; }
";

/// Issues a request to an admin JSON endpoint and reloads on success.
const ADMIN_SCRIPT: &str = "
    function adminAction(method, url, confirmText) {
        if (confirmText && !confirm(confirmText)) { return; }
        fetch(url, { method: method })
            .then(response => response.json())
            .then(data => {
                if (data.success) { window.location.reload(); }
                else { alert('Error: ' + data.error); }
            })
            .catch(error => alert('Error: ' + error.message));
    }
";

const IMPORT_SCRIPT: &str = "
    function importImages() {
        const button = document.getElementById('import-btn');
        const box = document.getElementById('result-box');
        const content = document.getElementById('result-content');
        button.disabled = true;
        button.textContent = 'Importing...';
        const show = (ok, html) => {
            box.className = ok ? 'panel success' : 'panel error';
            content.innerHTML = html;
            box.style.display = 'block';
            button.disabled = false;
            button.textContent = 'Import Images';
        };
        const text = value => { const node = document.createElement('span'); node.textContent = value; return node.innerHTML; };
        fetch('/admin/import/execute', { method: 'POST' })
            .then(response => response.json())
            .then(data => {
                if (data.success) {
                    show(true, '<h3>Import Successful</h3>'
                        + '<p><strong>Total images found:</strong> ' + data.total_found + '</p>'
                        + '<p><strong>Images imported:</strong> ' + data.imported + '</p>'
                        + '<p><strong>Images skipped:</strong> ' + data.skipped + ' (already in database)</p>');
                } else {
                    show(false, '<h3>Import Failed</h3><p><strong>Error:</strong> ' + text(data.error) + '</p>');
                }
            })
            .catch(error => show(false, '<h3>Import Failed</h3><p><strong>Error:</strong> ' + text(error.message) + '</p>'));
    }
";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

fn page(title: &str, site_name: &str, style: &str, script: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title} - {site}</title>\n\
         <style>{BASE_STYLE}{style}</style>\n<script>{script}</script>\n</head>\n<body>\n\
         <div class=\"container\">\n{body}\n</div>\n</body>\n</html>\n",
        title = escape(title),
        site = escape(site_name),
    )
}

fn header(title: &str) -> String {
    format!(
        "<div class=\"header\"><h1>{}</h1><a href=\"/admin\" class=\"btn\">&larr; Back to Dashboard</a></div>",
        escape(title)
    )
}

pub fn dashboard(site_name: &str, stats: &PortfolioStats) -> String {
    let stat_card = |value: String, label: &str| {
        format!(
            "<div class=\"stat-card\"><div class=\"stat-number\">{value}</div><div>{label}</div></div>"
        )
    };
    let featured_mark = if stats.has_featured_image { "&#10003;" } else { "&#10007;" };

    let mut body = format!(
        "<div style=\"text-align: center; margin-bottom: 40px;\"><h1>{}</h1><h2>Admin Dashboard</h2></div>\n",
        escape(site_name)
    );
    body.push_str("<div class=\"stats\">");
    body.push_str(&stat_card(stats.total_images.to_string(), "Total Images"));
    body.push_str(&stat_card(stats.published_images.to_string(), "Published Images"));
    body.push_str(&stat_card(stats.total_categories.to_string(), "Categories"));
    body.push_str(&stat_card(featured_mark.to_string(), "Featured Image"));
    body.push_str("</div>\n<div class=\"panel\"><h3>Images by Category</h3>");
    for stat in &stats.category_stats {
        body.push_str(&format!(
            "<div class=\"category-stat\"><span>{}</span><span>{} images</span></div>",
            escape(&stat.name),
            stat.count
        ));
    }
    body.push_str("</div>\n<div class=\"nav-links\">");
    for (href, title, blurb) in [
        ("/admin/import", "Import Existing Images", "Scan the photo volume and import new images"),
        ("/admin/portfolio", "Portfolio Management", "Review and manage your photography portfolio"),
        ("/admin/categories", "Category Management", "See categories and their image counts"),
        ("/admin/featured", "Featured Image", "Choose the featured image and view its EXIF data"),
        ("/", "View Website", "See your live photography website"),
    ] {
        body.push_str(&format!(
            "<a href=\"{href}\" class=\"nav-link\"><h3>{title}</h3><p>{blurb}</p></a>"
        ));
    }
    body.push_str("</div>");

    page("Admin", site_name, DASHBOARD_STYLE, "", &body)
}

pub fn import(site_name: &str, data_dir: &str) -> String {
    let data_dir = escape(data_dir);
    let body = format!(
        "{header}\n<div class=\"panel\">\
         <h3>Import from {data_dir}</h3>\
         <p>Scans <code>{data_dir}</code> for JPG, JPEG, PNG, GIF, BMP, TIFF and WebP files and adds new ones to the portfolio.</p>\
         <ul>\
         <li>Reads image dimensions and EXIF data</li>\
         <li>Creates titles from file names</li>\
         <li>Assigns new images to the default category</li>\
         <li>Skips images already in the database</li>\
         </ul>\
         <p><strong>Note:</strong> files on disk are never modified.</p></div>\n\
         <div style=\"text-align: center;\"><button id=\"import-btn\" class=\"btn\" onclick=\"importImages()\">Import Images</button></div>\n\
         <div id=\"result-box\" class=\"panel\" style=\"display: none; margin-top: 20px;\"><div id=\"result-content\"></div></div>",
        header = header("Import Existing Images"),
    );
    page(
        "Import Images",
        site_name,
        ".success { border-left: 4px solid #4CAF50; } .error { border-left: 4px solid #f44336; }",
        IMPORT_SCRIPT,
        &body,
    )
}

fn image_card(image: &ImageView, actions: &str, extra_class: &str) -> String {
    format!(
        "<div class=\"image-card{extra_class}\">\
         <img src=\"{src}\" alt=\"{alt}\" loading=\"lazy\">\
         <div class=\"image-info\">\
         <div class=\"image-title\">{title}</div>\
         <div class=\"image-meta\">Category: {category}<br>Size: {width}x{height}<br>Status: {status}</div>\
         {actions}</div></div>",
        src = escape(&image.web_path),
        alt = escape(image.alt_text.as_deref().unwrap_or_default()),
        title = escape(image.title.as_deref().unwrap_or(&image.filename)),
        category = escape(image.category_name.as_deref().unwrap_or("Uncategorized")),
        width = image.width.unwrap_or_default(),
        height = image.height.unwrap_or_default(),
        status = if image.is_published { "Published" } else { "Draft" },
    )
}

pub fn portfolio(site_name: &str, images: &[ImageView]) -> String {
    let mut body = header("Portfolio Management");
    body.push_str(
        "\n<div class=\"panel\"><h3>Your Portfolio Images</h3>\
         <p class=\"muted\">Use \"Import Existing Images\" from the dashboard to add more. \
         Deleting removes the catalog entry only; the file stays on disk.</p></div>\n",
    );

    if images.is_empty() {
        body.push_str(
            "<div class=\"no-images\"><h3>No Images Found</h3>\
             <p>Use the \"Import Existing Images\" button on the dashboard to import your photography.</p></div>",
        );
    } else {
        body.push_str("<div class=\"image-grid\">");
        for image in images {
            let actions = format!(
                "<button class=\"btn btn-danger\" onclick=\"adminAction('DELETE', '/admin/api/images/{}', 'Remove this image from the portfolio?')\">Delete</button>",
                image.id
            );
            body.push_str(&image_card(image, &actions, ""));
        }
        body.push_str("</div>");
    }

    page("Portfolio Management", site_name, GRID_STYLE, ADMIN_SCRIPT, &body)
}

pub fn categories(site_name: &str, categories: &[CategoryView]) -> String {
    let mut body = header("Category Management");
    body.push_str("\n<div class=\"category-list\">");
    for category in categories {
        body.push_str(&format!(
            "<div class=\"category-item\">\
             <div class=\"category-info\"><h3>{name}</h3><p class=\"muted\">{description}</p></div>\
             <div><span class=\"image-count\">{count} images</span>\
             <button class=\"btn btn-danger\" onclick=\"adminAction('DELETE', '/admin/api/categories/{id}', 'Delete this category and all of its images?')\">Delete</button></div>\
             </div>",
            name = escape(&category.name),
            description = escape(
                category
                    .description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .unwrap_or("No description")
            ),
            count = category.image_count,
            id = category.id,
        ));
    }
    body.push_str("</div>");

    page("Category Management", site_name, CATEGORY_STYLE, ADMIN_SCRIPT, &body)
}

pub fn featured(site_name: &str, current: Option<&FeaturedDetails>, images: &[ImageView]) -> String {
    let mut body = header("Featured Image");

    match current {
        Some(details) => {
            body.push_str("\n<div class=\"panel\"><h3>Current Featured Image</h3>");
            body.push_str(&image_card(&details.image, "", " current"));
            if details.exif.is_empty() {
                body.push_str("<p class=\"muted\">No EXIF data recorded.</p>");
            } else {
                body.push_str("<table class=\"exif\">");
                for (tag, value) in &details.exif {
                    body.push_str(&format!(
                        "<tr><td>{}</td><td>{}</td></tr>",
                        escape(tag),
                        escape(value)
                    ));
                }
                body.push_str("</table>");
            }
            body.push_str("</div>");
        }
        None => body.push_str("\n<div class=\"panel\"><h3>No featured image set</h3></div>"),
    }

    let current_id = current.map(|details| details.image.id);
    body.push_str("\n<div class=\"image-grid\">");
    for image in images {
        let (actions, class) = if Some(image.id) == current_id {
            (String::from("<span class=\"muted\">Featured</span>"), " current")
        } else {
            (
                format!(
                    "<button class=\"btn\" onclick=\"adminAction('POST', '/admin/api/images/{}/featured')\">Set as featured</button>",
                    image.id
                ),
                "",
            )
        };
        body.push_str(&image_card(image, &actions, class));
    }
    body.push_str("</div>");

    page("Featured Image", site_name, GRID_STYLE, ADMIN_SCRIPT, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::services::CategoryStat;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn dashboard_lists_stats_and_links() {
        let stats = PortfolioStats {
            total_images: 12,
            published_images: 9,
            total_categories: 5,
            has_featured_image: false,
            category_stats: vec![CategoryStat {
                name: "Street <live>".into(),
                count: 4,
            }],
        };
        let html = dashboard("Fifth Element Photography", &stats);
        assert!(html.contains("<div class=\"stat-number\">12</div>"));
        assert!(html.contains("Street &lt;live&gt;"));
        assert!(html.contains("href=\"/admin/featured\""));
        assert!(html.contains("<title>Admin - Fifth Element Photography</title>"));
    }

    #[test]
    fn empty_portfolio_shows_placeholder() {
        let html = portfolio("Site", &[]);
        assert!(html.contains("No Images Found"));
        assert!(!html.contains("image-grid\">"));
    }
}
