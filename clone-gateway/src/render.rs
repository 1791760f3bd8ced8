//! Stand-in render pipeline for the standalone binary.
//!
//! The production deployment plugs the full templating pipeline in
//! through the [`RenderPipeline`] seam; this implementation produces a
//! bare HTML shell so the gateway is usable on its own.

use async_trait::async_trait;
use nb_core::{DirectoryView, NotebookPage, RenderError, RenderPipeline};

pub struct PlainRenderer;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[async_trait]
impl RenderPipeline for PlainRenderer {
    async fn finish_notebook(&self, page: NotebookPage) -> Result<String, RenderError> {
        let title = page.title.as_deref().unwrap_or("Notebook");
        let mut nav = String::new();
        for crumb in &page.breadcrumbs {
            nav.push_str(&format!(
                "<a href=\"{}\">{}</a> / ",
                crumb.url,
                escape_html(&crumb.name)
            ));
        }
        Ok(format!(
            "<!DOCTYPE html>\n<html><head><title>{title}</title></head><body>\n\
             <nav>{nav}</nav>\n\
             <p><a href=\"{download}\">Download</a></p>\n\
             <pre>{content}</pre>\n\
             </body></html>\n",
            title = escape_html(title),
            nav = nav,
            download = page.download_url,
            content = escape_html(&page.raw_json),
        ))
    }

    async fn directory_listing(&self, view: DirectoryView) -> Result<String, RenderError> {
        let mut items = String::new();
        for entry in &view.listing.entries {
            items.push_str(&format!(
                "<li><a href=\"{}\">{}</a> <time>{}</time></li>\n",
                entry.url,
                escape_html(&entry.name),
                entry.modified_at.to_rfc3339()
            ));
        }
        Ok(format!(
            "<!DOCTYPE html>\n<html><head><title>{title}</title></head><body>\n\
             <h1>{title}</h1>\n<ul>\n{items}</ul>\n</body></html>\n",
            title = escape_html(&view.title),
            items = items,
        ))
    }
}
