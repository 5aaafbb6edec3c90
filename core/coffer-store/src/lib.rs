//! Encrypted key-value store façade.
//!
//! A [`Coffer`] wraps a backing [`Storage`] with encryption, optional
//! compression, and structured record coding. Its distinguishing feature
//! is sparse field encryption: records can mark individual fields as
//! `secure`, and only those fields are encrypted — the rest of the
//! record stays readable without the key through [`Coffer::sparse`].
//!
//! ```no_run
//! use coffer_store::{Coffer, CofferOptions, MemoryStore};
//! use coffer_crypto::{KeyLen, Mode, TextSecret};
//! use std::sync::Arc;
//!
//! let secret = Arc::new(TextSecret::new("i-am-a-good-secret"));
//! let options = CofferOptions::with_aes(KeyLen::Bits256, Mode::Cfb, secret);
//! let coffer = Coffer::new(Arc::new(MemoryStore::new()), options)?;
//! coffer.open()?;
//! coffer.put("vault", b"greeting", b"hello")?;
//! assert_eq!(coffer.get("vault", b"greeting")?, b"hello");
//! # Ok::<(), coffer_store::StoreError>(())
//! ```

mod coffer;
mod error;
mod keyring;
mod memory;
mod options;
mod redb_store;
mod storage;
mod value;

pub use coffer::Coffer;
pub use error::{StoreError, StoreResult};
pub use keyring::Keyring;
pub use memory::MemoryStore;
pub use options::CofferOptions;
pub use redb_store::RedbStore;
pub use storage::{valid_key, Storage};
pub use value::{Keyed, SecureValue, ValueId};
