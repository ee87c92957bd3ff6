//! # pagenote Net
//!
//! Everything that talks to the network on behalf of the client.
//!
//! ## Overview
//!
//! - [`Transport`] abstracts HTTP: one `send` that takes a request and
//!   returns status and body. [`ReqwestTransport`] is the real one,
//!   [`MemoryNetwork`] an in-process fake for tests.
//! - [`IndexClient`] queries the central index by privacy tag.
//! - [`PeerReader`] reads a record straight from a peer's store.
//! - [`Reader`] combines the two: index first, then a parallel fan-out to
//!   the peer set when the index has nothing.
//!
//! ## Read Path
//!
//! ```text
//! Reader::resolve(url, peers)
//!   |-- IndexClient::query(tag, peers) --> items?  -- yes --> sort, return
//!   |                                        | no
//!   |-- PeerReader::fetch_all(peers, address) (join_all, all settle)
//!   `-- sort newest first, return with Degradation
//! ```
//!
//! Index and peer failures never surface as errors; they degrade to fewer
//! results and are reported in [`Degradation`].

pub mod error;
pub mod http;
pub mod index;
pub mod peers;
pub mod reader;
pub mod transport;

pub use error::{NetError, Result};
pub use http::ReqwestTransport;
pub use index::{parse_index_body, IndexClient};
pub use peers::PeerReader;
pub use reader::{Degradation, Reader, ReaderConfig, SearchOutcome, Source};
pub use transport::{
    memory::MemoryNetwork, memory::MemoryTransport, HttpRequest, HttpResponse, Method, Transport,
};
