use std::time::SystemTime;

use crate::{metadata::Header, post::Post};

/// A published post together with what the index needs to know about it.
#[derive(Debug, Clone)]
pub(super) struct PublishedPost {
    pub post: Post,
    pub header: Header,
    pub modified: SystemTime,
}
