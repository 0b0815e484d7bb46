use std::sync::Arc;

use crate::openlibrary::client::OpenLibraryClient;
use crate::openlibrary::request::SearchField;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) client: Arc<OpenLibraryClient>,
    pub(crate) default_field: SearchField,
}
