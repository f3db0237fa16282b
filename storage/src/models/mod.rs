mod store_item;

pub use store_item::{StoreItem, ANY_E_TAG};
