//! メッセージ送信（通知）の実装
//!
//! - `channel`: 接続ごとの mpsc チャンネルへ書き込む実装（TCP 接続の writer タスクが読み出す）

pub mod channel;

pub use channel::ChannelMessagePusher;
