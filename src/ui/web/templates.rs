pub(crate) const INDEX_HTML: &str = include_str!("templates/index.html");
pub(crate) const APP_JS: &str = include_str!("templates/app.js");
pub(crate) const APP_CSS: &str = include_str!("templates/app.css");
pub(crate) const PLACEHOLDER_SVG: &str = include_str!("templates/placeholder.svg");
