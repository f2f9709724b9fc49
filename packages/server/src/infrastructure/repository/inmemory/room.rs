//! InMemory Room Repository 実装
//!
//! ルーム名 → ルーム状態のテーブルを 1 つの Mutex で保護します。
//! 履歴の追加・追い出しと新規参加者による履歴の読み出しは同じロックの中で行われるため、
//! 読み出し側が追い出し途中の状態を観測することはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PresenceRepository, Room, RoomError, RoomName, RoomRepository, Username};

#[derive(Default)]
struct RoomTable {
    rooms: HashMap<RoomName, Room>,
    /// Creation order, `general` first
    order: Vec<RoomName>,
}

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    table: Mutex<RoomTable>,
    /// Pointers into deleted rooms are rewritten here
    presence: Arc<dyn PresenceRepository>,
    history_capacity: usize,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成（`general` ルームを含む）
    pub fn new(presence: Arc<dyn PresenceRepository>, history_capacity: usize) -> Self {
        let general = RoomName::general();
        let mut table = RoomTable::default();
        table.rooms.insert(
            general.clone(),
            Room::new(general.clone(), None, history_capacity),
        );
        table.order.push(general);

        Self {
            table: Mutex::new(table),
            presence,
            history_capacity,
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, name: RoomName, creator: Username) -> Result<(), RoomError> {
        let mut table = self.table.lock().await;
        if table.rooms.contains_key(&name) {
            return Err(RoomError::RoomExists(name.into_string()));
        }
        name.validate_for_creation()?;

        table.rooms.insert(
            name.clone(),
            Room::new(name.clone(), Some(creator), self.history_capacity),
        );
        table.order.push(name);
        Ok(())
    }

    async fn delete_room(&self, name: &RoomName) -> Result<(), RoomError> {
        if name.is_general() {
            return Err(RoomError::ProtectedRoom(name.as_str().to_string()));
        }

        {
            let mut table = self.table.lock().await;
            if table.rooms.remove(name).is_none() {
                return Err(RoomError::NotFound(name.as_str().to_string()));
            }
            table.order.retain(|n| n != name);
        }

        // The room lock is released before touching presence
        let moved = self.presence.relocate(name, &RoomName::general()).await;
        tracing::debug!(
            "Room '{}' deleted, {} user(s) moved back to general",
            name,
            moved.len()
        );
        Ok(())
    }

    async fn join_room(&self, name: &RoomName, username: Username) -> Result<(), RoomError> {
        let mut table = self.table.lock().await;
        let room = table
            .rooms
            .get_mut(name)
            .ok_or_else(|| RoomError::NotFound(name.as_str().to_string()))?;
        room.add_member(username);
        Ok(())
    }

    async fn append_history(&self, name: &RoomName, frame: String) -> bool {
        let mut table = self.table.lock().await;
        match table.rooms.get_mut(name) {
            Some(room) => {
                room.push_history(frame);
                true
            }
            None => false,
        }
    }

    async fn list_room_names(&self) -> Vec<RoomName> {
        let table = self.table.lock().await;
        table.order.clone()
    }

    async fn get_history(&self, name: &RoomName) -> Vec<String> {
        let table = self.table.lock().await;
        table
            .rooms
            .get(name)
            .map(|room| room.history().cloned().collect())
            .unwrap_or_default()
    }

    async fn get_room(&self, name: &RoomName) -> Option<Room> {
        let table = self.table.lock().await;
        table.rooms.get(name).cloned()
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let table = self.table.lock().await;
        table
            .order
            .iter()
            .filter_map(|name| table.rooms.get(name).cloned())
            .collect()
    }
}
