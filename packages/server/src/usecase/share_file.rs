//! UseCase: ファイル共有処理
//!
//! base64 ペイロードをデコードして BlobStore に保存し、
//! `[FILE_SHARED]` フレームを指定ルームの履歴に追加して配信します。
//! チャットと違い、送信者への `[DELIVERED]` は送りません。

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{
    domain::{BlobStore, MessageId, RoomName, SharedFile, Username},
    infrastructure::dto::line::ServerFrame,
};

use super::{RoomPublisher, ShareFileError};

/// ファイル共有のユースケース
pub struct ShareFileUseCase {
    blob_store: Arc<dyn BlobStore>,
    publisher: Arc<RoomPublisher>,
}

impl ShareFileUseCase {
    pub fn new(blob_store: Arc<dyn BlobStore>, publisher: Arc<RoomPublisher>) -> Self {
        Self {
            blob_store,
            publisher,
        }
    }

    /// ファイル共有を実行
    ///
    /// # Errors
    ///
    /// ペイロードが base64 として不正な場合、または保存に失敗した場合。
    /// どちらの場合も何も配信されません。
    pub async fn execute(
        &self,
        sender: Username,
        room: RoomName,
        filename: String,
        size: u64,
        payload: String,
    ) -> Result<SharedFile, ShareFileError> {
        // 1. ペイロードをデコード
        let data = STANDARD.decode(payload.as_bytes())?;
        if data.len() as u64 != size {
            tracing::debug!(
                "Declared size {} of '{}' differs from decoded size {}",
                size,
                filename,
                data.len()
            );
        }

        // 2. 新しい ID で保存
        let id = MessageId::generate();
        self.blob_store.put(&id, &filename, data).await?;

        // 3. 履歴に追加してルームに配信
        let file = SharedFile {
            id,
            room,
            filename,
            sender,
            size,
            payload,
        };
        let frame = ServerFrame::from(&file).to_string();
        self.publisher.publish(&file.room, &frame).await;

        tracing::info!(
            "'{}' shared '{}' ({} bytes) in '{}'",
            file.sender,
            file.filename,
            file.size,
            file.room
        );
        Ok(file)
    }
}
