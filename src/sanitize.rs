use ammonia::Builder;

const ALLOWED_TAGS: [&str; 57] = [
    "html", "head", "title", "meta", "link", "style", "body", "div", "section", "article",
    "header", "footer", "main", "aside", "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "a",
    "button", "ul", "ol", "li", "table", "thead", "tbody", "tr", "th", "td", "img", "svg", "path",
    "g", "circle", "rect", "line", "polygon", "form", "input", "textarea", "select", "option",
    "label", "strong", "em", "b", "i", "u", "br", "hr", "small", "sub", "sup",
];

// `rel` on `<a>` is managed by link_rel, so it is only allowed per tag.
const ALLOWED_ATTRIBUTES: [&str; 38] = [
    "class", "id", "style", "href", "src", "alt", "title", "width", "height", "target", "type",
    "name", "value", "placeholder", "required", "disabled", "readonly", "checked", "selected",
    "for", "lang", "dir", "role", "charset", "content", "property", "crossorigin", "d",
    "viewBox", "fill", "stroke", "stroke-width", "xmlns", "http-equiv", "media", "sizes",
    "loading", "colspan",
];

/// Cleans a stored landing page before it is served publicly.
///
/// Scripts, event handler attributes and unknown elements are removed.
/// `data-*` and `aria-*` attributes survive so copy buttons keep working.
pub fn sanitize_document(html: &str) -> String {
    let mut builder = Builder::default();

    builder
        .rm_clean_content_tags(&["style"])
        .add_tags(&ALLOWED_TAGS)
        .add_generic_attributes(&ALLOWED_ATTRIBUTES)
        .add_tag_attributes("link", &["rel"])
        .add_generic_attribute_prefixes(&["data-", "aria-"]);

    let cleaned = builder.clean(html).to_string();

    format!("<!DOCTYPE html>\n{}", cleaned)
}
