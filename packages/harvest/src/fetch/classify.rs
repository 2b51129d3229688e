//! URL classification: which fetch branch handles a link.

/// Fetch branch for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Regular webpage, rendered via the page renderer
    Page,

    /// PDF document, downloaded and parsed locally
    Document,

    /// Not fetchable over HTTP (mailto:, tel:, javascript:, fragments)
    Unfetchable,
}

/// Classify a URL into its fetch branch.
///
/// PDFs are detected by suffix, a `.pdf?` query boundary, or a `/pdf/`
/// path segment, since report portals often serve PDFs from such paths.
pub fn classify_url(url: &str) -> UrlKind {
    let lower = url.to_lowercase();

    if lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("javascript:")
        || lower.starts_with('#')
    {
        return UrlKind::Unfetchable;
    }

    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return UrlKind::Unfetchable;
    }

    if lower.ends_with(".pdf") || lower.contains(".pdf?") || lower.contains("/pdf/") {
        return UrlKind::Document;
    }

    UrlKind::Page
}
