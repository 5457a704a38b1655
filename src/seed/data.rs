use crate::gateway::MemoryGateway;
use crate::model::{Category, Id, Property, PropertyOption};

/// Helper to build a category with its slug and property count filled in
fn create_category(id: Id, name: &str, parent_id: Option<Id>, properties_count: i64) -> Category {
    let mut category = Category::new(id, name, parent_id);
    category.slug = Some(name.to_lowercase().replace(' ', "-").replace('&', "and"));
    category.properties_count = properties_count;
    category
}

/// Helper to build a dropdown property. Options are `(id, name, has_child)`.
fn create_select_property(id: Id, name: &str, options: &[(Id, &str, bool)]) -> Property {
    Property::new(id, name).with_options(
        options
            .iter()
            .map(|&(option_id, option_name, has_child)| {
                PropertyOption::new(option_id, option_name, has_child)
            })
            .collect(),
    )
}

fn create_text_property(id: Id, name: &str, description: &str) -> Property {
    let mut property = Property::new(id, name);
    property.description = Some(description.to_string());
    property
}

/// Load the demo catalog into `gateway`
pub fn load_seed_data(gateway: MemoryGateway) -> MemoryGateway {
    let gateway = gateway.with_categories(seed_categories());
    let gateway = load_properties(gateway);
    load_option_properties(gateway)
}

/// A gateway serving only the demo catalog
pub fn seed_gateway() -> MemoryGateway {
    load_seed_data(MemoryGateway::new())
}

pub fn seed_categories() -> Vec<Category> {
    vec![
        create_category(1, "Electronics", None, 0),
        create_category(2, "Vehicles", None, 0),
        create_category(3, "Home & Garden", None, 0),
        create_category(11, "Phones", Some(1), 3),
        create_category(12, "Laptops", Some(1), 3),
        create_category(13, "Cameras", Some(1), 2),
        create_category(21, "Cars", Some(2), 3),
        create_category(22, "Motorcycles", Some(2), 2),
        // No properties; submitting here is rejected
        create_category(31, "Furniture", Some(3), 0),
    ]
}

fn load_properties(gateway: MemoryGateway) -> MemoryGateway {
    gateway
        .with_properties(
            11,
            vec![
                create_select_property(
                    100,
                    "Brand",
                    &[(1000, "Apple", true), (1001, "Samsung", true), (1002, "Huawei", false)],
                ),
                create_select_property(101, "Condition", &[(1010, "New", false), (1011, "Used", false)]),
                create_text_property(102, "Color", "Main body color"),
            ],
        )
        .with_properties(
            12,
            vec![
                create_select_property(
                    120,
                    "Brand",
                    &[(1200, "Apple", true), (1201, "Dell", false), (1202, "Lenovo", false)],
                ),
                create_select_property(
                    121,
                    "RAM",
                    &[(1210, "8 GB", false), (1211, "16 GB", false), (1212, "32 GB", false)],
                ),
                create_select_property(122, "Condition", &[(1220, "New", false), (1221, "Used", false)]),
            ],
        )
        .with_properties(
            13,
            vec![
                create_select_property(130, "Type", &[(1300, "DSLR", false), (1301, "Mirrorless", true)]),
                create_text_property(131, "Megapixels", "Sensor resolution"),
            ],
        )
        .with_properties(
            21,
            vec![
                // Carries its own "Other" entry, so no synthetic one is added
                create_select_property(
                    200,
                    "Make",
                    &[(2000, "Toyota", true), (2001, "BMW", true), (2002, "Other", false)],
                ),
                create_text_property(201, "Year", "Model year"),
                create_select_property(
                    202,
                    "Transmission",
                    &[(2020, "Automatic", false), (2021, "Manual", false)],
                ),
            ],
        )
        .with_properties(
            22,
            vec![
                create_select_property(
                    220,
                    "Type",
                    &[(2200, "Sport", false), (2201, "Cruiser", false), (2202, "Scooter", false)],
                ),
                create_text_property(221, "Engine size", "Displacement in cc"),
            ],
        )
}

fn load_option_properties(gateway: MemoryGateway) -> MemoryGateway {
    gateway
        // Phones / Apple
        .with_option_properties(
            1000,
            vec![
                create_select_property(
                    110,
                    "Model",
                    &[(1100, "iPhone 15 Pro", false), (1101, "iPhone 15", false), (1102, "iPhone 14", false)],
                ),
                create_select_property(
                    111,
                    "Storage",
                    &[(1110, "128 GB", false), (1111, "256 GB", false), (1112, "512 GB", false)],
                ),
            ],
        )
        // Phones / Samsung
        .with_option_properties(
            1001,
            vec![create_select_property(
                112,
                "Model",
                &[(1120, "Galaxy S24", false), (1121, "Galaxy Z Fold5", false)],
            )],
        )
        // Laptops / Apple
        .with_option_properties(
            1200,
            vec![create_select_property(123, "Chip", &[(1230, "M2", false), (1231, "M3", false)])],
        )
        // Cameras / Mirrorless
        .with_option_properties(
            1301,
            vec![create_select_property(
                132,
                "Mount",
                &[(1320, "Sony E", false), (1321, "Canon RF", false), (1322, "Nikon Z", false)],
            )],
        )
        // Cars / Toyota
        .with_option_properties(
            2000,
            vec![create_select_property(
                210,
                "Model",
                &[(2100, "Camry", true), (2101, "Corolla", false)],
            )],
        )
        // Cars / Toyota / Camry
        .with_option_properties(
            2100,
            vec![create_select_property(211, "Trim", &[(2110, "LE", false), (2111, "XSE", false)])],
        )
        // Cars / BMW
        .with_option_properties(
            2001,
            vec![create_select_property(
                212,
                "Series",
                &[(2120, "3 Series", false), (2121, "5 Series", false)],
            )],
        )
}
