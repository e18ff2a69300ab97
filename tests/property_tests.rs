use proptest::prelude::*;
use rust_decimal::Decimal;

use huduma_core::models::{Cart, CatalogEntry, Priority, ServiceCategory};

// Property-based test strategies
prop_compose! {
    fn arb_category()(category in prop_oneof![
        Just(ServiceCategory::Kra),
        Just(ServiceCategory::DataAnalytics),
        Just(ServiceCategory::BusinessRegistration),
        Just(ServiceCategory::Bookkeeping),
    ]) -> ServiceCategory {
        category
    }
}

prop_compose! {
    fn arb_amount()(units in 0i64..1_000_000) -> Decimal {
        Decimal::new(units, 0)
    }
}

prop_compose! {
    fn arb_signed_amount()(units in -1_000_000i64..1_000_000) -> Decimal {
        Decimal::new(units, 0)
    }
}

prop_compose! {
    fn arb_entry(category: ServiceCategory)(
        id in "[a-z][a-z0-9-]{2,24}",
        label in "[A-Za-z ]{3,40}",
        price in arb_amount(),
        variable in any::<bool>(),
        floor in arb_amount(),
    ) -> CatalogEntry {
        CatalogEntry {
            id,
            label,
            description: "generated entry".to_string(),
            price,
            has_variable_price: variable,
            min_price: if variable { Some(floor) } else { None },
            category,
            estimated_time: None,
            frequency: vec![],
            includes: vec![],
        }
    }
}

fn arb_cart(category: ServiceCategory) -> impl Strategy<Value = Cart> {
    prop::collection::vec(arb_entry(category), 0..8).prop_map(move |entries| {
        let mut cart = Cart::new(category);
        for entry in &entries {
            // Duplicate generated ids toggle back off; the cart stays
            // consistent either way.
            cart.toggle_selection(entry);
        }
        cart
    })
}

proptest! {
    #[test]
    fn custom_price_always_clamped_to_floor(
        floor in arb_amount(),
        requested in arb_signed_amount(),
    ) {
        let entry = CatalogEntry {
            id: "variable".to_string(),
            label: "Variable".to_string(),
            description: String::new(),
            price: floor + Decimal::new(500, 0),
            has_variable_price: true,
            min_price: Some(floor),
            category: ServiceCategory::Kra,
            estimated_time: None,
            frequency: vec![],
            includes: vec![],
        };

        let mut cart = Cart::new(ServiceCategory::Kra);
        cart.toggle_selection(&entry);
        cart.update_custom_price("variable", requested);

        let stored = cart.get_item("variable").unwrap().custom_price.unwrap();
        prop_assert_eq!(stored, requested.max(floor));
    }

    #[test]
    fn quantity_below_one_never_changes_state(
        cart in arb_cart(ServiceCategory::DataAnalytics),
    ) {
        let mut mutated = cart.clone();
        let ids: Vec<String> = cart.items.iter().map(|i| i.id.clone()).collect();

        for id in &ids {
            prop_assert!(!mutated.update_quantity(id, 0));
        }

        prop_assert_eq!(&mutated.items, &cart.items);
    }

    #[test]
    fn subtotal_is_sum_of_effective_price_times_quantity(
        cart in arb_cart(ServiceCategory::Bookkeeping),
        quantities in prop::collection::vec(1u32..50, 8),
    ) {
        let mut cart = cart;
        let ids: Vec<String> = cart.items.iter().map(|i| i.id.clone()).collect();
        for (id, quantity) in ids.iter().zip(quantities.iter()) {
            cart.update_quantity(id, *quantity);
        }

        let expected: Decimal = cart
            .items
            .iter()
            .map(|item| item.custom_price.unwrap_or(item.price) * Decimal::from(item.quantity))
            .sum();

        prop_assert_eq!(cart.subtotal(), expected);
    }

    #[test]
    fn persist_restore_round_trips_order_preserving(
        cart in arb_cart(ServiceCategory::Kra),
    ) {
        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(&restored, &cart);
        let original_ids: Vec<&str> = cart.items.iter().map(|i| i.id.as_str()).collect();
        let restored_ids: Vec<&str> = restored.items.iter().map(|i| i.id.as_str()).collect();
        prop_assert_eq!(restored_ids, original_ids);
    }

    #[test]
    fn toggle_twice_restores_membership(
        cart in arb_cart(ServiceCategory::BusinessRegistration),
        entry in arb_entry(ServiceCategory::BusinessRegistration),
    ) {
        let mut mutated = cart.clone();
        let was_selected = mutated.contains_item(&entry.id);

        mutated.toggle_selection(&entry);
        prop_assert_eq!(mutated.contains_item(&entry.id), !was_selected);

        mutated.toggle_selection(&entry);
        prop_assert_eq!(mutated.contains_item(&entry.id), was_selected);

        // Membership is restored and no id is ever duplicated.
        prop_assert_eq!(mutated.items.len(), cart.items.len());
        for item in &mutated.items {
            let id = item.id.as_str();
            prop_assert_eq!(mutated.items.iter().filter(|i| i.id == id).count(), 1);
        }
    }

    #[test]
    fn only_express_priority_carries_a_surcharge(total in arb_amount()) {
        prop_assert_eq!(total * Priority::Express.multiplier(), total * Decimal::new(13, 1));
        prop_assert_eq!(total * Priority::Normal.multiplier(), total);
        prop_assert_eq!(total * Priority::Urgent.multiplier(), total);
    }
}
