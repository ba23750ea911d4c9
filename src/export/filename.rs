//! Suggested file names for exported pages.

/// Used when a binder name has no ASCII letters or digits at all.
const FALLBACK_SLUG: &str = "binder";

/// Reduce a binder name to lowercase ASCII letters, digits and single hyphens.
///
/// Every other character becomes a hyphen, runs of hyphens collapse to one,
/// and leading or trailing hyphens are dropped.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// File name suggested for page `page_number` (1-based) of a binder.
///
/// ```
/// use photocard_binder::export::generate_filename;
///
/// assert_eq!(
///     generate_filename("My K-pop Collection!", 2),
///     "my-k-pop-collection-page-2.pdf"
/// );
/// ```
#[must_use]
pub fn generate_filename(binder_name: &str, page_number: usize) -> String {
    let slug = slugify(binder_name);
    let slug = if slug.is_empty() { FALLBACK_SLUG } else { slug.as_str() };
    format!("{slug}-page-{page_number}.pdf")
}
