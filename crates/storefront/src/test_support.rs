//! An in-memory stand-in for the Postgres repositories, used by service and
//! handler tests. Orderings and conflict rules mirror the SQL ones.

use crate::{
    abstract_trait::{
        address::{AddressRepositoryTrait, DynAddressRepository},
        cart::{CartRepositoryTrait, DynCartRepository},
        order::{
            DynOrderCommandRepository, DynOrderQueryRepository, OrderCommandRepositoryTrait,
            OrderQueryRepositoryTrait,
        },
        product::{DynProductRepository, ProductRepositoryTrait},
    },
    domain::{
        payment::PaidTransition,
        requests::{
            address::{CreateAddressRecordRequest, CreateAddressRequest},
            order::CreateOrderRecordRequest,
        },
    },
    model::{
        address::Address as AddressModel,
        order::{Order as OrderModel, OrderItem as OrderItemModel},
        product::Product as ProductModel,
    },
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use shared::{
    domain::{Cart, CartLine},
    errors::RepositoryError,
};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

#[derive(Default)]
struct State {
    next_id: i32,
    tick: i64,
    carts: BTreeMap<i32, Cart>,
    products: BTreeMap<i32, ProductModel>,
    addresses: BTreeMap<i32, AddressModel>,
    orders: BTreeMap<i32, OrderModel>,
    items: Vec<OrderItemModel>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    /// A logical clock, one second per write, so "newest first" is strict.
    fn now(&mut self) -> NaiveDateTime {
        self.tick += 1;
        let base = NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid base timestamp");
        base + Duration::seconds(self.tick)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("store lock poisoned")
    }

    pub fn add_user(&self) -> i32 {
        let mut state = self.lock();
        let id = state.next_id();
        state.carts.insert(id, Cart::new());
        id
    }

    pub fn set_cart(&self, user_id: i32, lines: Vec<CartLine>) {
        let cart = Cart::try_from_lines(lines).expect("test carts are well formed");
        self.lock().carts.insert(user_id, cart);
    }

    pub fn cart_of(&self, user_id: i32) -> Option<Vec<CartLine>> {
        self.lock()
            .carts
            .get(&user_id)
            .map(|cart| cart.lines().to_vec())
    }

    pub fn add_product(&self, name: &str, price: i64, offer_price: Option<i64>) -> i32 {
        let mut state = self.lock();
        let id = state.next_id();
        let now = state.now();
        state.products.insert(
            id,
            ProductModel {
                product_id: id,
                name: name.to_string(),
                description: format!("{name} description"),
                category: "General".into(),
                price,
                offer_price,
                images: vec![format!("{}.png", name.to_lowercase())],
                in_stock: true,
                created_at: Some(now),
                updated_at: Some(now),
            },
        );
        id
    }

    pub fn remove_product(&self, product_id: i32) {
        self.lock().products.remove(&product_id);
    }

    pub fn add_address(&self, user_id: i32) -> i32 {
        let record = CreateAddressRecordRequest::new(user_id, &address_request("Main St"));
        self.lock().insert_address(&record).address_id
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn carts(&self) -> DynCartRepository {
        Arc::new(self.clone())
    }

    pub fn products(&self) -> DynProductRepository {
        Arc::new(self.clone())
    }

    pub fn addresses(&self) -> DynAddressRepository {
        Arc::new(self.clone())
    }

    pub fn order_commands(&self) -> DynOrderCommandRepository {
        Arc::new(self.clone())
    }

    pub fn order_queries(&self) -> DynOrderQueryRepository {
        Arc::new(self.clone())
    }
}

impl State {
    fn insert_address(&mut self, req: &CreateAddressRecordRequest) -> AddressModel {
        let id = self.next_id();
        let address = AddressModel {
            address_id: id,
            user_id: req.user_id,
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            email: req.email.clone(),
            street: req.street.clone(),
            city: req.city.clone(),
            state: req.state.clone(),
            country: req.country.clone(),
            zip_code: req.zip_code.clone(),
            phone: req.phone.clone(),
            created_at: Some(self.now()),
        };
        self.addresses.insert(id, address.clone());
        address
    }
}

pub fn address_request(street: &str) -> CreateAddressRequest {
    CreateAddressRequest {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        street: street.to_string(),
        city: "London".into(),
        state: "Greater London".into(),
        country: "UK".into(),
        zip_code: "NW1".into(),
        phone: "+44 20 7946 0000".into(),
    }
}

fn newest_first(mut orders: Vec<OrderModel>) -> Vec<OrderModel> {
    orders.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then(b.order_id.cmp(&a.order_id))
    });
    orders
}

#[async_trait]
impl CartRepositoryTrait for InMemoryStore {
    async fn get_cart(&self, user_id: i32) -> Result<Cart, RepositoryError> {
        self.lock()
            .carts
            .get(&user_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn save_cart(&self, user_id: i32, cart: &Cart) -> Result<(), RepositoryError> {
        match self.lock().carts.get_mut(&user_id) {
            Some(stored) => {
                *stored = cart.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[async_trait]
impl ProductRepositoryTrait for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<ProductModel>, RepositoryError> {
        let mut products: Vec<_> = self.lock().products.values().cloned().collect();
        products.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.product_id.cmp(&a.product_id))
        });
        Ok(products)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        Ok(self.lock().products.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<ProductModel>, RepositoryError> {
        let state = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl AddressRepositoryTrait for InMemoryStore {
    async fn create_address(
        &self,
        req: &CreateAddressRecordRequest,
    ) -> Result<AddressModel, RepositoryError> {
        let mut state = self.lock();
        if !state.carts.contains_key(&req.user_id) {
            return Err(RepositoryError::ForeignKey("unknown user".into()));
        }
        Ok(state.insert_address(req))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<AddressModel>, RepositoryError> {
        Ok(self.lock().addresses.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<AddressModel>, RepositoryError> {
        let state = self.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.addresses.get(id).cloned())
            .collect())
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<AddressModel>, RepositoryError> {
        // BTreeMap iteration is by id, which follows insertion order.
        Ok(self
            .lock()
            .addresses
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryStore {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<(OrderModel, Vec<OrderItemModel>), RepositoryError> {
        let mut state = self.lock();
        let id = state.next_id();
        let now = state.now();

        let order = OrderModel {
            order_id: id,
            user_id: req.user_id,
            amount: req.amount,
            address_id: req.address_id,
            payment_type: req.payment_type.as_str().to_string(),
            is_paid: false,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let items: Vec<OrderItemModel> = req
            .items
            .iter()
            .map(|item| OrderItemModel {
                order_id: id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        state.orders.insert(id, order.clone());
        state.items.extend(items.iter().cloned());

        Ok((order, items))
    }

    async fn mark_paid(&self, order_id: i32) -> Result<PaidTransition, RepositoryError> {
        let mut state = self.lock();
        let now = state.now();
        Ok(match state.orders.get_mut(&order_id) {
            None => PaidTransition::Missing,
            Some(order) if order.is_paid => PaidTransition::AlreadyPaid,
            Some(order) => {
                order.is_paid = true;
                order.updated_at = Some(now);
                PaidTransition::Marked
            }
        })
    }

    async fn delete_unpaid(&self, order_id: i32) -> Result<bool, RepositoryError> {
        let mut state = self.lock();
        let unpaid = state.orders.get(&order_id).is_some_and(|o| !o.is_paid);
        if unpaid {
            state.orders.remove(&order_id);
            state.items.retain(|item| item.order_id != order_id);
        }
        Ok(unpaid)
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<OrderModel>, RepositoryError> {
        Ok(newest_first(self.lock().orders.values().cloned().collect()))
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<OrderModel>, RepositoryError> {
        Ok(newest_first(
            self.lock()
                .orders
                .values()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        Ok(self.lock().orders.get(&id).cloned())
    }

    async fn find_items(&self, order_ids: &[i32]) -> Result<Vec<OrderItemModel>, RepositoryError> {
        Ok(self
            .lock()
            .items
            .iter()
            .filter(|item| order_ids.contains(&item.order_id))
            .cloned()
            .collect())
    }
}
