//! Deterministic dataset generation from seed definitions.
//!
//! Generation walks the marketplace parents-first: accounts, partner kitchens,
//! catalogue, subscriptions, orders and payments, then chat and feedback. Each
//! step draws from one `ChaCha8Rng`, so the same seed value and profile always
//! produce byte-identical documents.

use chrono::{Days, NaiveDate};
use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{Value, json};

use crate::dataset::SeedDataset;
use crate::error::GenerationError;
use crate::ids::object_id;
use crate::profile::ProfileVolumes;
use crate::registry::SeedDefinition;

const CUISINES: [&str; 8] = [
    "north-indian",
    "south-indian",
    "gujarati",
    "bengali",
    "punjabi",
    "maharashtrian",
    "jain",
    "continental",
];

const CATEGORY_NAMES: [&str; 8] = [
    "Breakfast",
    "Thalis",
    "Curries",
    "Breads",
    "Rice Bowls",
    "Snacks",
    "Desserts",
    "Beverages",
];

const MENU_NAMES: [&str; 5] = ["Weekday", "Weekend", "Festive", "Lunchbox", "Dinner"];

const DISHES: [&str; 16] = [
    "Dal Tadka",
    "Paneer Butter Masala",
    "Aloo Paratha",
    "Rajma Chawal",
    "Masala Dosa",
    "Idli Sambar",
    "Veg Pulao",
    "Chole Bhature",
    "Poha",
    "Upma",
    "Kadhi Chawal",
    "Baingan Bharta",
    "Chicken Curry",
    "Fish Curry",
    "Gulab Jamun",
    "Masala Chaas",
];

const PLAN_NAMES: [&str; 4] = ["Daily Lunch", "Office Duo", "Family Feast", "Student Saver"];

const PLAN_DURATIONS: [u64; 3] = [7, 14, 30];

const DIETS: [&str; 5] = ["vegetarian", "vegan", "jain", "eggetarian", "non-vegetarian"];

const CITIES: [&str; 6] = ["Pune", "Mumbai", "Bengaluru", "Ahmedabad", "Kolkata", "Delhi"];

const ORDER_STATUSES: [&str; 4] = ["pending", "confirmed", "delivered", "cancelled"];

const FEEDBACK_CATEGORIES: [&str; 4] = ["food_quality", "delivery", "app", "other"];

const MESSAGES: [&str; 6] = [
    "Hi, is today's lunch on schedule?",
    "Yes, it leaves the kitchen at noon.",
    "Could you make it less spicy?",
    "Noted, we will adjust the masala.",
    "Thanks for the quick reply!",
    "Happy to help.",
];

/// Generates a complete marketplace dataset from a seed definition.
///
/// # Errors
///
/// Returns [`GenerationError`] if a dependent collection has no parents to
/// reference or a generated date overflows the calendar.
///
/// # Example
///
/// ```
/// use seed_data::{SeedDefinition, SeedProfile, generate_dataset};
///
/// let seed_def = SeedDefinition::new("demo", 42, SeedProfile::Minimal);
/// let dataset = generate_dataset(&seed_def).expect("generated");
///
/// assert_eq!(dataset.documents("partners").len(), 2);
/// assert_eq!(dataset, generate_dataset(&seed_def).expect("generated"));
/// ```
pub fn generate_dataset(seed_def: &SeedDefinition) -> Result<SeedDataset, GenerationError> {
    let mut generator = Generator {
        rng: ChaCha8Rng::seed_from_u64(seed_def.seed()),
        volumes: seed_def.profile().volumes(),
    };
    let mut dataset = SeedDataset::new(seed_def.seed(), seed_def.profile());
    generator.populate(&mut dataset)?;
    Ok(dataset)
}

#[derive(Debug, Clone)]
struct PartnerRef {
    partner_id: String,
    user_id: String,
}

#[derive(Debug, Clone)]
struct ItemRef {
    id: String,
    name: String,
    price: u32,
    owner_user_id: String,
}

#[derive(Debug, Clone)]
struct PlanRef {
    id: String,
    price: u32,
    duration_days: u64,
}

struct Generator {
    rng: ChaCha8Rng,
    volumes: ProfileVolumes,
}

impl Generator {
    fn populate(&mut self, dataset: &mut SeedDataset) -> Result<(), GenerationError> {
        let mut users = Vec::new();
        let admin_ids = self.accounts("admin", self.volumes.admins, &mut users)?;
        let partner_user_ids = self.accounts("partner", self.volumes.partners, &mut users)?;
        let customer_ids = self.accounts("customer", self.volumes.customers, &mut users)?;
        dataset.insert("users", users);

        let (partners, partner_docs) = self.partners(&partner_user_ids);
        dataset.insert("partners", partner_docs);
        dataset.insert("customerprofiles", self.customer_profiles(&customer_ids));

        let (items, catalogue) = self.catalogue(&partners)?;
        let (categories, menus, menu_items) = catalogue;
        dataset.insert("categories", categories);
        dataset.insert("menus", menus);
        dataset.insert("menuitems", menu_items);

        let (plans, plan_docs) = self.plans();
        dataset.insert("subscriptionplans", plan_docs);
        let (subscriptions, subscription_payments) =
            self.subscriptions(&customer_ids, &plans)?;
        dataset.insert("subscriptions", subscriptions);

        let (orders, order_payments) = self.orders(&customer_ids, &partners, &items)?;
        dataset.insert("orders", orders);
        dataset.insert(
            "payments",
            order_payments.into_iter().chain(subscription_payments).collect(),
        );

        let support_staff: Vec<String> = admin_ids.into_iter().chain(partner_user_ids).collect();
        let (conversations, messages) = self.conversations(&customer_ids, &support_staff)?;
        dataset.insert("conversations", conversations);
        dataset.insert("chatmessages", messages);
        dataset.insert("feedback", self.feedback(&customer_ids)?);
        Ok(())
    }

    fn accounts(
        &mut self,
        role: &str,
        count: usize,
        users: &mut Vec<Value>,
    ) -> Result<Vec<String>, GenerationError> {
        let mut ids = Vec::with_capacity(count);
        for index in 0..count {
            let id = object_id(&mut self.rng);
            let first: String = FirstName(EN).fake_with_rng(&mut self.rng);
            let last: String = LastName(EN).fake_with_rng(&mut self.rng);
            let email = format!(
                "{}.{}.{role}{index}@tiffin.test",
                email_part(&first),
                email_part(&last)
            );
            let phone = format!("+91{}", self.rng.random_range(6_000_000_000_u64..=9_999_999_999));
            let joined = date_after(self.rng.random_range(0..60))?;
            users.push(json!({
                "_id": id,
                "email": email,
                "firstName": first,
                "lastName": last,
                "role": role,
                "phone": phone,
                "password": format!("$2b$10${}", object_id(&mut self.rng)),
                "isActive": true,
                "__v": 0,
                "createdAt": joined,
            }));
            ids.push(id);
        }
        Ok(ids)
    }

    fn partners(&mut self, partner_user_ids: &[String]) -> (Vec<PartnerRef>, Vec<Value>) {
        let mut refs = Vec::with_capacity(partner_user_ids.len());
        let mut docs = Vec::with_capacity(partner_user_ids.len());
        for user_id in partner_user_ids {
            let partner_id = object_id(&mut self.rng);
            let family: String = LastName(EN).fake_with_rng(&mut self.rng);
            let cuisines: Vec<&str> = CUISINES.choose_multiple(&mut self.rng, 2).copied().collect();
            docs.push(json!({
                "_id": partner_id,
                "user": user_id,
                "businessName": format!("{family} Kitchen"),
                "description": format!("Home-style tiffins from the {family} family."),
                "cuisineTypes": cuisines,
                "status": "approved",
                "isVerified": true,
            }));
            refs.push(PartnerRef {
                partner_id,
                user_id: user_id.clone(),
            });
        }
        (refs, docs)
    }

    fn customer_profiles(&mut self, customer_ids: &[String]) -> Vec<Value> {
        customer_ids
            .iter()
            .map(|user_id| {
                let diets: Vec<&str> = DIETS.choose_multiple(&mut self.rng, 1).copied().collect();
                let city = CITIES.choose(&mut self.rng).copied().unwrap_or("Pune");
                json!({
                    "_id": object_id(&mut self.rng),
                    "user": user_id,
                    "dietaryPreferences": diets,
                    "defaultAddress": {
                        "city": city,
                        "pincode": format!("{}", self.rng.random_range(110_001_u32..=799_999)),
                    },
                })
            })
            .collect()
    }

    fn catalogue(
        &mut self,
        partners: &[PartnerRef],
    ) -> Result<(Vec<ItemRef>, (Vec<Value>, Vec<Value>, Vec<Value>)), GenerationError> {
        let mut categories = Vec::new();
        let mut menus = Vec::new();
        let mut menu_items = Vec::new();
        let mut items = Vec::new();

        for partner in partners {
            let category_ids = self.partner_categories(partner, &mut categories);
            for menu_name in MENU_NAMES
                .iter()
                .cycle()
                .take(self.volumes.menus_per_partner)
            {
                let menu_id = object_id(&mut self.rng);
                menus.push(json!({
                    "_id": menu_id,
                    "name": format!("{menu_name} Menu"),
                    "description": format!("{menu_name} dishes, cooked fresh."),
                    "restaurant": partner.partner_id,
                    "isActive": true,
                }));
                for _ in 0..self.volumes.items_per_menu {
                    let category_id = category_ids
                        .choose(&mut self.rng)
                        .cloned()
                        .ok_or(GenerationError::MissingParent {
                            child: "menuitems",
                            parent: "categories",
                        })?;
                    let item = self.menu_item(partner, &menu_id, &category_id);
                    menu_items.push(item.0);
                    items.push(item.1);
                }
            }
        }
        Ok((items, (categories, menus, menu_items)))
    }

    fn partner_categories(&mut self, partner: &PartnerRef, out: &mut Vec<Value>) -> Vec<String> {
        let names: Vec<&str> = CATEGORY_NAMES
            .choose_multiple(&mut self.rng, self.volumes.categories_per_partner)
            .copied()
            .collect();
        names
            .into_iter()
            .map(|name| {
                let id = object_id(&mut self.rng);
                out.push(json!({
                    "_id": id,
                    "name": name,
                    "description": format!("{name} prepared daily."),
                    "businessPartner": partner.user_id,
                    "isActive": true,
                }));
                id
            })
            .collect()
    }

    fn menu_item(
        &mut self,
        partner: &PartnerRef,
        menu_id: &str,
        category_id: &str,
    ) -> (Value, ItemRef) {
        let id = object_id(&mut self.rng);
        let name = DISHES.choose(&mut self.rng).copied().unwrap_or("House Thali");
        let price = self.rng.random_range(60_u32..=320);
        let image = format!("https://images.tiffin.test/items/{id}.jpg");
        let vegetarian = !name.contains("Chicken") && !name.contains("Fish");
        let doc = json!({
            "_id": id,
            "name": name,
            "description": format!("{name}, packed hot."),
            "price": price,
            "category": category_id,
            "menu": menu_id,
            "businessPartner": partner.user_id,
            "imageUrl": image,
            "images": [image],
            "isAvailable": self.rng.random_ratio(9, 10),
            "isVegetarian": vegetarian,
            "tags": if vegetarian { vec!["veg"] } else { vec!["non-veg"] },
        });
        let item = ItemRef {
            id,
            name: name.to_owned(),
            price,
            owner_user_id: partner.user_id.clone(),
        };
        (doc, item)
    }

    fn plans(&mut self) -> (Vec<PlanRef>, Vec<Value>) {
        let mut refs = Vec::with_capacity(self.volumes.plans);
        let mut docs = Vec::with_capacity(self.volumes.plans);
        for name in PLAN_NAMES.iter().cycle().take(self.volumes.plans) {
            let id = object_id(&mut self.rng);
            let duration_days = PLAN_DURATIONS.choose(&mut self.rng).copied().unwrap_or(30);
            let price = self.rng.random_range(900_u32..=6_000);
            docs.push(json!({
                "_id": id,
                "name": name,
                "description": format!("{name} plan over {duration_days} days."),
                "price": price,
                "durationDays": duration_days,
                "mealsPerDay": self.rng.random_range(1_u32..=2),
                "isActive": true,
            }));
            refs.push(PlanRef {
                id,
                price,
                duration_days,
            });
        }
        (refs, docs)
    }

    fn subscriptions(
        &mut self,
        customer_ids: &[String],
        plans: &[PlanRef],
    ) -> Result<(Vec<Value>, Vec<Value>), GenerationError> {
        let mut subscriptions = Vec::new();
        let mut payments = Vec::new();
        for customer in customer_ids {
            for _ in 0..self.volumes.subscriptions_per_customer {
                let plan = plans
                    .choose(&mut self.rng)
                    .cloned()
                    .ok_or(GenerationError::MissingParent {
                        child: "subscriptions",
                        parent: "subscriptionplans",
                    })?;
                let start_offset = self.rng.random_range(0_u64..90);
                let end_offset = start_offset.saturating_add(plan.duration_days);
                let id = object_id(&mut self.rng);
                subscriptions.push(json!({
                    "_id": id,
                    "customer": customer,
                    "plan": plan.id,
                    "startDate": date_after(start_offset)?,
                    "endDate": date_after(end_offset)?,
                    "status": "active",
                }));
                payments.push(json!({
                    "_id": object_id(&mut self.rng),
                    "customerId": customer,
                    "referenceId": id,
                    "referenceType": "subscription",
                    "amount": plan.price,
                    "status": "completed",
                }));
            }
        }
        Ok((subscriptions, payments))
    }

    fn orders(
        &mut self,
        customer_ids: &[String],
        partners: &[PartnerRef],
        items: &[ItemRef],
    ) -> Result<(Vec<Value>, Vec<Value>), GenerationError> {
        let mut orders = Vec::new();
        let mut payments = Vec::new();
        for customer in customer_ids {
            for _ in 0..self.volumes.orders_per_customer {
                let partner = partners.choose(&mut self.rng).ok_or(GenerationError::MissingParent {
                    child: "orders",
                    parent: "partners",
                })?;
                let own_items: Vec<&ItemRef> = items
                    .iter()
                    .filter(|item| item.owner_user_id == partner.user_id)
                    .collect();
                let line_count = self.rng.random_range(1_usize..=3);
                let lines: Vec<&ItemRef> = own_items
                    .choose_multiple(&mut self.rng, line_count)
                    .copied()
                    .collect();
                if lines.is_empty() {
                    return Err(GenerationError::MissingParent {
                        child: "orders",
                        parent: "menuitems",
                    });
                }
                let total: u32 = lines.iter().map(|item| item.price).sum();
                let id = object_id(&mut self.rng);
                let status = ORDER_STATUSES.choose(&mut self.rng).copied().unwrap_or("pending");
                orders.push(json!({
                    "_id": id,
                    "customer": customer,
                    "businessPartner": partner.user_id,
                    "items": lines
                        .iter()
                        .map(|item| json!({
                            "menuItem": item.id,
                            "name": item.name,
                            "price": item.price,
                            "quantity": 1,
                        }))
                        .collect::<Vec<_>>(),
                    "totalAmount": total,
                    "status": status,
                    "createdAt": date_after(self.rng.random_range(0..120))?,
                }));
                payments.push(json!({
                    "_id": object_id(&mut self.rng),
                    "customerId": customer,
                    "referenceId": id,
                    "referenceType": "order",
                    "amount": total,
                    "status": if status == "cancelled" { "refunded" } else { "completed" },
                }));
            }
        }
        Ok((orders, payments))
    }

    fn conversations(
        &mut self,
        customer_ids: &[String],
        staff_ids: &[String],
    ) -> Result<(Vec<Value>, Vec<Value>), GenerationError> {
        let mut conversations = Vec::with_capacity(self.volumes.conversations);
        let mut messages = Vec::new();
        for _ in 0..self.volumes.conversations {
            let customer = customer_ids.choose(&mut self.rng).cloned().ok_or(
                GenerationError::MissingParent {
                    child: "conversations",
                    parent: "users",
                },
            )?;
            let staff = staff_ids.choose(&mut self.rng).cloned().ok_or(
                GenerationError::MissingParent {
                    child: "conversations",
                    parent: "users",
                },
            )?;
            let id = object_id(&mut self.rng);
            conversations.push(json!({
                "_id": id,
                "type": if self.rng.random_ratio(1, 2) { "support" } else { "order" },
                "participants": [
                    {"userId": customer, "role": "customer"},
                    {"userId": staff, "role": "staff"},
                ],
            }));
            let speakers = [customer, staff];
            for (turn, speaker) in speakers
                .iter()
                .cycle()
                .take(self.volumes.messages_per_conversation)
                .enumerate()
            {
                let content = MESSAGES.iter().cycle().nth(turn).copied().unwrap_or("Hello");
                messages.push(json!({
                    "_id": object_id(&mut self.rng),
                    "conversationId": id,
                    "senderId": speaker,
                    "content": content,
                }));
            }
        }
        Ok((conversations, messages))
    }

    fn feedback(&mut self, customer_ids: &[String]) -> Result<Vec<Value>, GenerationError> {
        let mut entries = Vec::with_capacity(self.volumes.feedback);
        for _ in 0..self.volumes.feedback {
            let user = customer_ids.choose(&mut self.rng).cloned().ok_or(
                GenerationError::MissingParent {
                    child: "feedback",
                    parent: "users",
                },
            )?;
            let category = FEEDBACK_CATEGORIES
                .choose(&mut self.rng)
                .copied()
                .unwrap_or("other");
            entries.push(json!({
                "_id": object_id(&mut self.rng),
                "user": user,
                "rating": self.rng.random_range(1_u32..=5),
                "category": category,
                "comment": "Tasty and on time.",
            }));
        }
        Ok(entries)
    }
}

/// Lowercase ASCII alphanumerics only, so fake names form valid emails.
fn email_part(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// ISO-8601 midnight timestamp `offset_days` after 2026-01-01.
fn date_after(offset_days: u64) -> Result<String, GenerationError> {
    NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|epoch| epoch.checked_add_days(Days::new(offset_days)))
        .map(|date| date.format("%Y-%m-%dT00:00:00.000Z").to_string())
        .ok_or(GenerationError::DateOutOfRange { offset_days })
}
