// tests/catalog_filter_tests.rs
mod common;

use common::*;
use storefront::catalog::{matches_category, matches_search, CATEGORY_ID_PREFIX};
use storefront::{normalize_category_slug, PriceRange, Product, ProductFilter, SortKey};

fn ids(products: &[Product]) -> Vec<&str> {
  products.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn test_search_matches_title_case_insensitively() {
  let products = vec![product("a", "Laptop", 1.0), product("b", "Lamp", 1.0), product("c", "Phone", 1.0)];
  let filter = ProductFilter {
    search: "lap".to_string(),
    ..Default::default()
  };
  assert_eq!(ids(&filter.apply(&products)), vec!["a"]);

  let filter = ProductFilter {
    search: "LAPTOP".to_string(),
    ..Default::default()
  };
  assert_eq!(ids(&filter.apply(&products)), vec!["a"]);
}

#[test]
fn test_search_la_matches_laptop_and_lamp() {
  let products = vec![product("a", "Laptop", 1.0), product("b", "Lamp", 1.0), product("c", "Phone", 1.0)];
  let filter = ProductFilter {
    search: "la".to_string(),
    ..Default::default()
  };
  assert_eq!(ids(&filter.apply(&products)), vec!["a", "b"]);
  assert!(matches_search(&products[1], "LAMP"));
  assert!(!matches_search(&products[2], "la"));
}

#[test]
fn test_search_also_matches_brand_and_description() {
  let mut by_brand = product("a", "Widget", 1.0);
  by_brand.brand = "Lapland Goods".to_string();
  let mut by_description = product("b", "Gadget", 1.0);
  by_description.description = "Fits any LAPtop bag".to_string();
  let other = product("c", "Gizmo", 1.0);

  let products = vec![by_brand, by_description, other];
  let filter = ProductFilter {
    search: "lap".to_string(),
    ..Default::default()
  };
  assert_eq!(ids(&filter.apply(&products)), vec!["a", "b"]);
}

#[test]
fn test_empty_search_matches_everything() {
  let products = sample_products();
  assert_eq!(ProductFilter::default().apply(&products).len(), products.len());
}

#[test]
fn test_category_slug_normalization() {
  assert_eq!(normalize_category_slug("Electronics"), "cat_electronics");
  assert_eq!(normalize_category_slug("Home & Garden"), "cat_homegarden");
  assert_eq!(normalize_category_slug("Kids' Toys 2-5"), "cat_kidstoys25");
  assert!(normalize_category_slug("").starts_with(CATEGORY_ID_PREFIX));
}

#[test]
fn test_category_filter_uses_normalized_display_name() {
  let products = sample_products();
  let filter = ProductFilter {
    category: Some("Home & Garden".to_string()),
    ..Default::default()
  };
  assert_eq!(ids(&filter.apply(&products)), vec!["p3"]);

  let lamp = &products[2];
  assert!(matches_category(lamp, None));
  assert!(matches_category(lamp, Some("All")));
  assert!(matches_category(lamp, Some("home & garden")));
  assert!(!matches_category(lamp, Some("Sports")));
}

#[test]
fn test_price_range_with_open_upper_bound() {
  let products = vec![product("a", "Ten", 10.0), product("b", "Twenty", 20.0), product("c", "Thirty", 30.0)];
  let filter = ProductFilter {
    min_price: "20".to_string(),
    max_price: String::new(),
    ..Default::default()
  };
  assert_eq!(ids(&filter.apply(&products)), vec!["b", "c"]);
}

#[test]
fn test_price_bounds_are_inclusive_and_invalid_means_unbounded() {
  let range = PriceRange::parse("10", "20");
  assert!(range.contains(10.0));
  assert!(range.contains(20.0));
  assert!(!range.contains(20.01));

  let range = PriceRange::parse("abc", " 15.5 ");
  assert_eq!(range.min, None);
  assert_eq!(range.max, Some(15.5));

  let range = PriceRange::parse("", "");
  assert!(range.contains(0.0));
  assert!(range.contains(1e12));

  assert_eq!(PriceRange::parse("NaN", "inf"), PriceRange::default());
}

#[test]
fn test_filters_are_a_conjunction_in_any_order() {
  let products = sample_products();
  let searches = ["", "o", "north", "lamp"];
  let categories = [None, Some("All"), Some("Electronics"), Some("Sports")];
  let bounds = [("", ""), ("20", ""), ("", "700"), ("30", "40")];

  for search in searches {
    for category in categories {
      for (min, max) in bounds {
        let combined = ProductFilter {
          search: search.to_string(),
          category: category.map(str::to_string),
          min_price: min.to_string(),
          max_price: max.to_string(),
          sort: SortKey::Featured,
        };
        let only_search = ProductFilter {
          search: search.to_string(),
          ..Default::default()
        };
        let only_category = ProductFilter {
          category: category.map(str::to_string),
          ..Default::default()
        };
        let only_price = ProductFilter {
          min_price: min.to_string(),
          max_price: max.to_string(),
          ..Default::default()
        };

        let expected: Vec<&str> = products
          .iter()
          .filter(|p| only_search.matches(p) && only_category.matches(p) && only_price.matches(p))
          .map(|p| p.id.as_str())
          .collect();
        let all_at_once = combined.apply(&products);
        assert_eq!(ids(&all_at_once), expected, "search={search:?} category={category:?} bounds=({min:?},{max:?})");

        // Sequential application in a different order lands on the same set.
        let chained = only_search.apply(&only_price.apply(&only_category.apply(&products)));
        assert_eq!(ids(&chained), expected);
      }
    }
  }
}

#[test]
fn test_featured_preserves_fetch_order() {
  let products = sample_products();
  let visible = ProductFilter::default().apply(&products);
  assert_eq!(ids(&visible), ids(&products));
}

#[test]
fn test_sort_keys() {
  let products = sample_products();
  let sorted = |sort: SortKey| {
    let filter = ProductFilter {
      sort,
      ..Default::default()
    };
    filter.apply(&products).into_iter().map(|p| p.id).collect::<Vec<_>>()
  };

  assert_eq!(sorted(SortKey::PriceLow), vec!["p1", "p3", "p4", "p2"]);
  assert_eq!(sorted(SortKey::PriceHigh), vec!["p2", "p4", "p3", "p1"]);
  assert_eq!(sorted(SortKey::Rating), vec!["p1", "p2", "p4", "p3"]);
  assert_eq!(sorted(SortKey::Newest), vec!["p4", "p2", "p3", "p1"]);
}

#[test]
fn test_sort_is_stable_for_ties() {
  let products = vec![product("x", "X", 5.0), product("y", "Y", 5.0), product("z", "Z", 1.0)];
  let filter = ProductFilter {
    sort: SortKey::PriceLow,
    ..Default::default()
  };
  assert_eq!(ids(&filter.apply(&products)), vec!["z", "x", "y"]);

  let filter = ProductFilter {
    sort: SortKey::PriceHigh,
    ..Default::default()
  };
  assert_eq!(ids(&filter.apply(&products)), vec!["x", "y", "z"]);
}

#[test]
fn test_sort_key_parsing() {
  assert_eq!(SortKey::from_key("price-low"), SortKey::PriceLow);
  assert_eq!(SortKey::from_key("price-high"), SortKey::PriceHigh);
  assert_eq!(SortKey::from_key("rating"), SortKey::Rating);
  assert_eq!(SortKey::from_key("newest"), SortKey::Newest);
  assert_eq!(SortKey::from_key("featured"), SortKey::Featured);
  assert_eq!(SortKey::from_key("bestselling"), SortKey::Featured);
  assert_eq!(SortKey::Newest.as_key(), "newest");
}

#[test]
fn test_blank_category_selection_shows_every_category() {
  let products = sample_products();
  for selection in ["", "   "] {
    let filter = ProductFilter {
      category: Some(selection.to_string()),
      ..Default::default()
    };
    assert_eq!(filter.apply(&products).len(), products.len(), "selection {selection:?}");
    assert!(products.iter().all(|p| matches_category(p, Some(selection))));
  }
}
