//! 购物车
//!
//! 仅存在于内存中，刷新即清空。每本书一行，数量始终 >= 1；
//! 把数量设为 0 或负数会直接删除该行。

use bookstore_shared::{Book, CheckoutItem, CheckoutRequest, Country, TAX_RATE_PERCENT};
use leptos::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub price_cents: i64,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_book(book: &Book, quantity: u32) -> Self {
        Self {
            book_id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            price_cents: book.price,
            quantity,
        }
    }

    pub fn line_total_cents(&self) -> i64 {
        self.price_cents * i64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingCountry {
    pub id: i64,
    pub name: String,
    pub shipping_cost_cents: i64,
}

impl From<&Country> for ShippingCountry {
    fn from(country: &Country) -> Self {
        Self {
            id: country.id,
            name: country.name.clone(),
            shipping_cost_cents: country.shipping_cost,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
    shipping_country: Option<ShippingCountry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 加入购物车；同一本书合并数量，数量为 0 时忽略
    pub fn add(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|i| i.book_id == item.book_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    /// 设置数量；`quantity <= 0` 删除该行
    pub fn set_quantity(&mut self, book_id: i64, quantity: i64) {
        if quantity <= 0 {
            self.remove(book_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|i| i.book_id == book_id) {
            item.quantity = quantity;
        }
    }

    pub fn remove(&mut self, book_id: i64) {
        self.items.retain(|i| i.book_id != book_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn shipping_country(&self) -> Option<&ShippingCountry> {
        self.shipping_country.as_ref()
    }

    pub fn set_shipping_country(&mut self, country: Option<ShippingCountry>) {
        self.shipping_country = country;
    }

    /// 商品总件数
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(CartItem::line_total_cents).sum()
    }

    /// 税额，按分四舍五入
    pub fn tax_cents(&self) -> i64 {
        let scaled = self.subtotal_cents() * TAX_RATE_PERCENT;
        (scaled + 50).div_euclid(100)
    }

    pub fn shipping_cents(&self) -> i64 {
        self.shipping_country
            .as_ref()
            .map_or(0, |c| c.shipping_cost_cents)
    }

    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents() + self.tax_cents() + self.shipping_cents()
    }

    /// 生成结算请求；购物车为空或未选择配送国家时返回 `None`
    pub fn to_checkout_request(&self, customer_email: Option<String>) -> Option<CheckoutRequest> {
        if self.items.is_empty() {
            return None;
        }
        let country = self.shipping_country.as_ref()?;
        Some(CheckoutRequest {
            items: self
                .items
                .iter()
                .map(|i| CheckoutItem {
                    book_id: i.book_id,
                    quantity: i.quantity,
                })
                .collect(),
            country_id: country.id,
            customer_email,
        })
    }
}

/// 购物车上下文
#[derive(Clone, Copy)]
pub struct CartContext {
    pub cart: RwSignal<Cart>,
}

impl CartContext {
    pub fn new() -> Self {
        Self {
            cart: RwSignal::new(Cart::new()),
        }
    }

    pub fn add_book(&self, book: &Book) {
        let item = CartItem::from_book(book, 1);
        self.cart.update(|cart| cart.add(item));
    }

    pub fn item_count(&self) -> Signal<u32> {
        let cart = self.cart;
        Signal::derive(move || cart.with(Cart::item_count))
    }
}

impl Default for CartContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_cart() -> CartContext {
    use_context::<CartContext>().expect("CartContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(book_id: i64, price_cents: i64, quantity: u32) -> CartItem {
        CartItem {
            book_id,
            title: format!("Livre {}", book_id),
            author: "Auteur".into(),
            price_cents,
            quantity,
        }
    }

    #[test]
    fn test_totals_with_tax_and_shipping() {
        let mut cart = Cart::new();
        cart.add(item(1, 1000, 2));
        cart.add(item(2, 500, 1));
        cart.set_shipping_country(Some(ShippingCountry {
            id: 1,
            name: "France".into(),
            shipping_cost_cents: 590,
        }));

        assert_eq!(cart.subtotal_cents(), 2500);
        assert_eq!(cart.tax_cents(), 500);
        assert_eq!(cart.shipping_cents(), 590);
        assert_eq!(cart.total_cents(), 2500 + 500 + 590);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_merges_same_book() {
        let mut cart = Cart::new();
        cart.add(item(1, 1000, 1));
        cart.add(item(1, 1000, 2));
        cart.add(item(2, 500, 0));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_non_positive_quantity_removes_line() {
        let mut cart = Cart::new();
        cart.add(item(1, 1000, 2));
        cart.add(item(2, 500, 1));

        cart.set_quantity(1, 5);
        assert_eq!(cart.items()[0].quantity, 5);

        cart.set_quantity(1, 0);
        cart.set_quantity(2, -3);
        assert!(cart.is_empty());
        assert!(cart.items().iter().all(|i| i.quantity >= 1));
    }

    #[test]
    fn test_tax_rounding() {
        let mut cart = Cart::new();
        cart.add(item(1, 999, 1));
        // 999 * 20% = 199.8 -> 200
        assert_eq!(cart.tax_cents(), 200);
        assert_eq!(cart.shipping_cents(), 0);
    }

    #[test]
    fn test_checkout_request_requires_country() {
        let mut cart = Cart::new();
        assert!(cart.to_checkout_request(None).is_none());
        cart.add(item(7, 1200, 2));
        assert!(cart.to_checkout_request(None).is_none());

        cart.set_shipping_country(Some(ShippingCountry {
            id: 3,
            name: "Belgique".into(),
            shipping_cost_cents: 890,
        }));
        let req = cart.to_checkout_request(Some("c@d.fr".into())).unwrap();
        assert_eq!(req.country_id, 3);
        assert_eq!(
            req.items,
            vec![CheckoutItem {
                book_id: 7,
                quantity: 2
            }]
        );
    }
}
