//! The domain store - single authoritative snapshot of every collection.
//!
//! All mutations go through [`DataStore`]. Each one takes the writer lock,
//! builds the next version of the affected collection, persists it through the
//! collection's [`Repository`], and only then swaps it into the in-memory
//! snapshot. A failed write therefore leaves memory and storage in agreement
//! on the previous value. Holding one writer lock for every kind serialises
//! concurrent callers in arrival order, so no update is lost.
//!
//! Until one [`DataStore::reload`] has succeeded the snapshot does not reflect
//! storage, so every mutation is refused with [`Error::NotLoaded`].

use crate::{
    config::AppConfig,
    errors::{Error, Result},
    models::{
        Booking, BudgetItem, Client, Draft, EntityKind, Expense, HotelRoom, Invoice, Itinerary,
        PricingWorksheet, Record, Task, Vendor, new_id,
    },
    storage::{BackingStore, Repository, SqliteStore},
};
use chrono::Utc;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, broadcast};
use tracing::{debug, error, info, instrument, trace, warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Proof that the caller holds the store's writer lock.
pub(crate) type WriteGuard<'a> = MutexGuard<'a, ()>;

/// Point-in-time copy of every collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// All clients
    pub clients: Vec<Client>,
    /// All bookings
    pub bookings: Vec<Booking>,
    /// All expenses
    pub expenses: Vec<Expense>,
    /// All invoices
    pub invoices: Vec<Invoice>,
    /// All vendors
    pub vendors: Vec<Vendor>,
    /// All hotel rooms
    pub hotel_rooms: Vec<HotelRoom>,
    /// All tasks
    pub tasks: Vec<Task>,
    /// All itineraries
    pub itineraries: Vec<Itinerary>,
    /// All pricing worksheets
    pub pricing_worksheets: Vec<PricingWorksheet>,
    /// All budget items
    pub budget_items: Vec<BudgetItem>,
}

impl Snapshot {
    /// Looks up a record of any kind by id.
    #[must_use]
    pub fn find<R: Record>(&self, id: &str) -> Option<&R> {
        R::collection(self).iter().find(|r| r.id() == id)
    }

    /// The client with this id, if it still exists.
    #[must_use]
    pub fn client(&self, id: &str) -> Option<&Client> {
        self.find(id)
    }

    /// The booking with this id, if it still exists.
    #[must_use]
    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.find(id)
    }
}

/// A change published to subscribers after it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Every collection was reloaded from storage
    Reloaded,
    /// A record was created
    Added {
        /// Collection changed
        kind: EntityKind,
        /// Id of the new record
        id: String,
    },
    /// A record was replaced
    Updated {
        /// Collection changed
        kind: EntityKind,
        /// Id of the replaced record
        id: String,
    },
    /// A record was deleted
    Removed {
        /// Collection changed
        kind: EntityKind,
        /// Id of the deleted record
        id: String,
    },
}

/// Owns the in-memory snapshot and mediates every mutation.
pub struct DataStore {
    backing: Arc<dyn BackingStore>,
    snapshot: RwLock<Snapshot>,
    writer: Mutex<()>,
    loading: AtomicBool,
    loaded: AtomicBool,
    events: broadcast::Sender<StoreEvent>,
    config: AppConfig,
}

impl DataStore {
    /// Creates a store over `backing` with default settings.
    ///
    /// The store reports [`is_loading`](Self::is_loading) until the first
    /// successful [`reload`](Self::reload).
    #[must_use]
    pub fn new(backing: Arc<dyn BackingStore>) -> Self {
        Self::with_config(backing, AppConfig::default())
    }

    /// Creates a store over `backing` with the given settings.
    #[must_use]
    pub fn with_config(backing: Arc<dyn BackingStore>, config: AppConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backing,
            snapshot: RwLock::new(Snapshot::default()),
            writer: Mutex::new(()),
            loading: AtomicBool::new(true),
            loaded: AtomicBool::new(false),
            events,
            config,
        }
    }

    /// Opens the `SQLite` store at `database_url` and performs the initial load.
    pub async fn open(database_url: &str, config: AppConfig) -> Result<Self> {
        let backing = SqliteStore::connect(database_url).await?;
        let store = Self::with_config(Arc::new(backing), config);
        store.reload().await?;
        Ok(store)
    }

    /// Settings this store was created with.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether a reload is in flight, or no reload has succeeded yet.
    /// Snapshot contents are not meaningful while this is true.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) || !self.is_loaded()
    }

    /// Whether a reload has succeeded at least once. Mutations are rejected
    /// until it has.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Receives an event after every persisted change.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Reloads every collection from storage.
    ///
    /// All ten collections are read concurrently and swapped in at once. If any
    /// read fails the previous snapshot is kept and the error is returned; a
    /// store that never loaded stays unloaded and keeps refusing writes.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<()> {
        let _guard = self.writer.lock().await;
        self.loading.store(true, Ordering::SeqCst);

        let loaded = self.load_all().await;
        self.loading.store(false, Ordering::SeqCst);

        let snapshot = loaded.inspect_err(|e| error!("Reload failed: {}", e))?;
        info!(
            "Reloaded store: {} clients, {} bookings, {} invoices, {} tasks",
            snapshot.clients.len(),
            snapshot.bookings.len(),
            snapshot.invoices.len(),
            snapshot.tasks.len()
        );
        *self.snapshot.write().await = snapshot;
        self.loaded.store(true, Ordering::SeqCst);
        self.publish(StoreEvent::Reloaded);
        Ok(())
    }

    async fn load_all(&self) -> Result<Snapshot> {
        let clients = self.repository::<Client>();
        let bookings = self.repository::<Booking>();
        let expenses = self.repository::<Expense>();
        let invoices = self.repository::<Invoice>();
        let vendors = self.repository::<Vendor>();
        let hotel_rooms = self.repository::<HotelRoom>();
        let tasks = self.repository::<Task>();
        let itineraries = self.repository::<Itinerary>();
        let pricing_worksheets = self.repository::<PricingWorksheet>();
        let budget_items = self.repository::<BudgetItem>();

        let (
            clients,
            bookings,
            expenses,
            invoices,
            vendors,
            hotel_rooms,
            tasks,
            itineraries,
            pricing_worksheets,
            budget_items,
        ) = tokio::try_join!(
            clients.get_all(),
            bookings.get_all(),
            expenses.get_all(),
            invoices.get_all(),
            vendors.get_all(),
            hotel_rooms.get_all(),
            tasks.get_all(),
            itineraries.get_all(),
            pricing_worksheets.get_all(),
            budget_items.get_all(),
        )?;

        Ok(Snapshot {
            clients,
            bookings,
            expenses,
            invoices,
            vendors,
            hotel_rooms,
            tasks,
            itineraries,
            pricing_worksheets,
            budget_items,
        })
    }

    /// A copy of the current snapshot, for running derivations.
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    /// Borrows the current snapshot without copying. Mutations wait until the
    /// guard is dropped.
    pub async fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().await
    }

    /// A copy of one collection.
    pub async fn all<R: Record>(&self) -> Vec<R> {
        R::collection(&*self.snapshot.read().await).clone()
    }

    /// A copy of one record, if it exists.
    pub async fn get<R: Record>(&self, id: &str) -> Option<R> {
        self.snapshot.read().await.find::<R>(id).cloned()
    }

    /// Creates a record from `draft` with a new id (and `createdAt` where the
    /// kind carries one), persists the collection and returns the record.
    pub async fn add<D: Draft>(&self, draft: D) -> Result<D::Output> {
        let guard = self.lock_writer().await?;
        self.add_locked(&guard, draft).await
    }

    /// Replaces the stored record with the same id, keeping its position and
    /// its `createdAt`.
    ///
    /// Fails with [`Error::NotFound`] if no record has that id; nothing is
    /// written in that case.
    pub async fn update<R: Record>(&self, record: R) -> Result<()> {
        let guard = self.lock_writer().await?;
        self.update_locked(&guard, record).await
    }

    /// Deletes the record with `id`. Returns `false` (and writes nothing) if
    /// there was no such record. Records referencing it are left untouched.
    pub async fn remove<R: Record>(&self, id: &str) -> Result<bool> {
        let guard = self.lock_writer().await?;
        self.remove_locked::<R>(&guard, id).await
    }

    /// Replaces the record with `id` by the result of `edit`, all under the
    /// writer lock, and returns the new version.
    ///
    /// Nested documents (itinerary days, cost items, room allocations) are
    /// edited this way: `edit` builds a whole new record from the current one
    /// and nothing is visible until it has been persisted.
    pub async fn modify<R, F>(&self, id: &str, edit: F) -> Result<R>
    where
        R: Record,
        F: FnOnce(&R) -> Result<R> + Send,
    {
        let guard = self.lock_writer().await?;
        let current = self
            .get::<R>(id)
            .await
            .ok_or_else(|| Error::not_found(R::KIND, id))?;
        let next = edit(&current)?;
        if next.id() != current.id() {
            return Err(Error::not_found(R::KIND, next.id()));
        }
        self.update_locked(&guard, next).await?;
        self.get::<R>(id)
            .await
            .ok_or_else(|| Error::not_found(R::KIND, id))
    }

    /// Takes the writer lock for a mutation.
    ///
    /// # Errors
    /// [`Error::NotLoaded`] if no reload has succeeded yet.
    pub(crate) async fn lock_writer(&self) -> Result<WriteGuard<'_>> {
        let guard = self.writer.lock().await;
        if !self.is_loaded() {
            warn!("Refusing write to a store that has not loaded");
            return Err(Error::NotLoaded);
        }
        Ok(guard)
    }

    /// [`add`](Self::add) for callers already holding the writer lock.
    pub(crate) async fn add_locked<D: Draft>(
        &self,
        guard: &WriteGuard<'_>,
        draft: D,
    ) -> Result<D::Output> {
        let mut record = draft.into_record(new_id(), Utc::now());
        record.normalize();

        let mut next = self.collection::<D::Output>().await;
        next.push(record.clone());
        self.persist(guard, next).await?;

        debug!("Added {} '{}'", D::Output::KIND, record.id());
        self.publish(StoreEvent::Added {
            kind: D::Output::KIND,
            id: record.id().to_string(),
        });
        Ok(record)
    }

    /// [`remove`](Self::remove) for callers already holding the writer lock.
    pub(crate) async fn remove_locked<R: Record>(
        &self,
        guard: &WriteGuard<'_>,
        id: &str,
    ) -> Result<bool> {
        let mut next = self.collection::<R>().await;
        let before = next.len();
        next.retain(|r| r.id() != id);
        if next.len() == before {
            debug!("Remove of missing {} '{}' ignored", R::KIND, id);
            return Ok(false);
        }

        self.persist(guard, next).await?;
        debug!("Removed {} '{}'", R::KIND, id);
        self.publish(StoreEvent::Removed {
            kind: R::KIND,
            id: id.to_string(),
        });
        Ok(true)
    }

    /// [`update`](Self::update) for callers already holding the writer lock.
    pub(crate) async fn update_locked<R: Record>(
        &self,
        guard: &WriteGuard<'_>,
        mut record: R,
    ) -> Result<()> {
        let id = record.id().to_string();
        let mut next = self.collection::<R>().await;
        let slot = next
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Error::not_found(R::KIND, id.clone()))?;
        record.keep_immutable_fields(slot);
        record.normalize();
        *slot = record;

        self.persist(guard, next).await?;
        debug!("Updated {} '{}'", R::KIND, id);
        self.publish(StoreEvent::Updated { kind: R::KIND, id });
        Ok(())
    }

    /// Writes `next` to storage, then makes it the in-memory collection.
    pub(crate) async fn persist<R: Record>(
        &self,
        _guard: &WriteGuard<'_>,
        next: Vec<R>,
    ) -> Result<()> {
        self.repository::<R>()
            .save(&next)
            .await
            .inspect_err(|e| error!("Persisting {} collection failed: {}", R::KIND, e))?;
        *R::collection_mut(&mut *self.snapshot.write().await) = next;
        Ok(())
    }

    async fn collection<R: Record>(&self) -> Vec<R> {
        R::collection(&*self.snapshot.read().await).clone()
    }

    fn repository<R: Record>(&self) -> Repository<R> {
        Repository::new(Arc::clone(&self.backing))
    }

    fn publish(&self, event: StoreEvent) {
        if self.events.send(event).is_err() {
            trace!("No subscribers for store event");
        }
    }
}
