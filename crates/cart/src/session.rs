use crate::sync::{DynCartSync, SyncError};
use shared::domain::{Cart, CartError, Catalog};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

/// Outcome of one background push, in mutation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncNotice {
    Synced { lines: usize },
    Failed { message: String },
}

/// The shopper's cart as the client sees it.
///
/// Mutations apply locally and return immediately. Each successful mutation
/// queues the resulting snapshot for a background task that pushes snapshots
/// one at a time, so the server always ends up with the latest one. Must be
/// created inside a tokio runtime.
pub struct CartSession {
    cart: Cart,
    sync: DynCartSync,
    snapshots: mpsc::UnboundedSender<Cart>,
    worker: JoinHandle<()>,
}

impl CartSession {
    pub fn new(sync: DynCartSync) -> (Self, mpsc::UnboundedReceiver<SyncNotice>) {
        Self::with_cart(Cart::new(), sync)
    }

    /// Starts from an already known snapshot, e.g. the one returned at login.
    pub fn with_cart(
        cart: Cart,
        sync: DynCartSync,
    ) -> (Self, mpsc::UnboundedReceiver<SyncNotice>) {
        let (snapshots, queued) = mpsc::unbounded_channel();
        let (notices, notice_rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(push_snapshots(sync.clone(), queued, notices));

        (
            Self {
                cart,
                sync,
                snapshots,
                worker,
            },
            notice_rx,
        )
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_line(&mut self, product_id: i32) -> &Cart {
        let next = self.cart.add_line(product_id);
        self.commit(next)
    }

    /// Rejects `quantity < 1` and leaves the cart as it was.
    pub fn set_quantity(&mut self, product_id: i32, quantity: i32) -> Result<&Cart, CartError> {
        let next = self.cart.set_quantity(product_id, quantity)?;
        Ok(self.commit(next))
    }

    pub fn remove_one(&mut self, product_id: i32) -> &Cart {
        let next = self.cart.remove_one(product_id);
        self.commit(next)
    }

    pub fn total_item_count(&self) -> i64 {
        self.cart.total_item_count()
    }

    pub fn total_amount<C: Catalog + ?Sized>(&self, catalog: &C) -> i64 {
        self.cart.total_amount(catalog)
    }

    /// Replaces the local snapshot with the server copy. Nothing is pushed.
    pub async fn refresh(&mut self) -> Result<&Cart, SyncError> {
        self.cart = self.sync.fetch().await?;
        info!("🔄 Cart refreshed from server ({} lines)", self.cart.len());
        Ok(&self.cart)
    }

    /// Waits until every queued snapshot has been pushed.
    pub async fn close(self) {
        let Self {
            snapshots, worker, ..
        } = self;
        drop(snapshots);

        if let Err(e) = worker.await {
            warn!("⚠️ Cart sync task ended abnormally: {e}");
        }
    }

    fn commit(&mut self, next: Cart) -> &Cart {
        if self.snapshots.send(next.clone()).is_err() {
            warn!("⚠️ Cart sync task is gone, change kept locally only");
        }
        self.cart = next;
        &self.cart
    }
}

async fn push_snapshots(
    sync: DynCartSync,
    mut queued: mpsc::UnboundedReceiver<Cart>,
    notices: mpsc::UnboundedSender<SyncNotice>,
) {
    while let Some(cart) = queued.recv().await {
        let notice = match sync.push(&cart).await {
            Ok(()) => {
                debug!("🛒 Cart synced ({} lines)", cart.len());
                SyncNotice::Synced { lines: cart.len() }
            }
            Err(err) => {
                warn!("⚠️ Cart sync failed: {err}");
                SyncNotice::Failed {
                    message: err.to_string(),
                }
            }
        };

        // Nobody listening is fine.
        let _ = notices.send(notice);
    }
}
