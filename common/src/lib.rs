//! Wire contract of `memo.MemoService`, shared by the server and its clients.
//!
//! The messages are generated from `proto/memo.proto` by `prost-build` and
//! also (de)serialize with `serde` following the protobuf JSON mapping, so the
//! same type travels over either codec.

mod codec;
mod error;
mod json;

mod bindings {
    include!(concat!(env!("OUT_DIR"), "/memo.rs"));
}

pub use bindings::*;
pub use codec::{Codec, CodecError, WireMessage};
pub use error::{Code, ErrorBody};

pub const SERVICE_NAME: &str = "memo.MemoService";

pub const LIST_MEMOS_PATH: &str = "/memo.MemoService/ListMemos";
pub const GET_MEMO_PATH: &str = "/memo.MemoService/GetMemo";
pub const CREATE_MEMO_PATH: &str = "/memo.MemoService/CreateMemo";
pub const UPDATE_MEMO_PATH: &str = "/memo.MemoService/UpdateMemo";

/// Header announcing the Connect protocol revision.
pub const PROTOCOL_VERSION_HEADER: &str = "connect-protocol-version";
pub const PROTOCOL_VERSION: &str = "1";
