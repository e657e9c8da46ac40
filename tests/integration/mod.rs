//! Integration tests driving the apkship binary

mod helpers;
mod test_publish;
mod test_push_metadata;
mod test_sheets_token;
