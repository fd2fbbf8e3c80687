pub mod draft_store;
