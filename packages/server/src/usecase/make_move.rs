//! UseCase: セルの選択

use std::sync::Arc;

use super::{EffectDispatcher, SharedWorld};
use crate::domain::{Cell, ConnectionId};

pub struct MakeMoveUseCase {
    world: SharedWorld,
    dispatcher: Arc<EffectDispatcher>,
}

impl MakeMoveUseCase {
    pub fn new(world: SharedWorld, dispatcher: Arc<EffectDispatcher>) -> Self {
        Self { world, dispatcher }
    }

    pub async fn execute(&self, connection_id: &ConnectionId, cell: Cell) {
        let mut world = self.world.lock().await;
        let effects = world.make_move(connection_id, cell);
        self.dispatcher.dispatch(effects).await;
    }
}
