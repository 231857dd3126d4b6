//! Whole-word keyword rules for assigning a category to a description.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use crate::categorizer::CategoryLabel;

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));

/// The categories with keyword rules, in the order they are tried.
///
/// The first category with a matching keyword wins, so earlier categories take
/// priority when a description mentions more than one.
pub const KEYWORD_ORDER: [CategoryLabel; 9] = [
    CategoryLabel::Food,
    CategoryLabel::Transport,
    CategoryLabel::Shopping,
    CategoryLabel::Bills,
    CategoryLabel::Healthcare,
    CategoryLabel::Education,
    CategoryLabel::Rent,
    CategoryLabel::Entertainment,
    CategoryLabel::Salary,
];

/// The lowercase keywords and phrases for `label`.
pub fn keywords(label: CategoryLabel) -> &'static [&'static str] {
    match label {
        CategoryLabel::Food => &[
            "food", "foods", "meal", "meals", "lunch", "dinner", "breakfast", "pizza", "burger",
            "sandwich", "snacks", "restaurant", "hotel", "grocery", "groceries", "supermarket",
            "market", "kirana", "vegetable", "vegetables", "veggies", "fruits", "fruit", "milk",
            "bread", "rice", "dal", "oil", "egg", "eggs", "swiggy", "zomato", "blinkit", "zepto",
            "instamart",
        ],
        CategoryLabel::Transport => &[
            "transport", "travel", "trip", "journey", "commute", "uber", "ola", "rapido", "taxi",
            "cab", "auto", "bus", "metro", "train", "railway", "flight", "air", "airport", "ticket",
            "fuel", "petrol", "diesel", "cng", "parking", "toll",
        ],
        CategoryLabel::Shopping => &[
            "shopping", "purchase", "buy", "bought", "order", "amazon", "flipkart", "myntra", "ajio",
            "meesho", "clothes", "dress", "shirt", "tshirt", "jeans", "shoes", "sandals", "footwear",
            "bag", "wallet", "watch", "mobile", "phone", "electronics", "book", "books", "novel",
            "stationery", "pen", "notebook",
        ],
        CategoryLabel::Bills => &[
            "bill", "bills", "payment", "paid", "electricity", "power", "current", "water", "gas",
            "lpg", "wifi", "internet", "broadband", "mobile recharge", "recharge", "phone bill",
            "dth", "cable", "emi", "loan", "installment", "credit card", "debit card",
            "bank charge",
        ],
        CategoryLabel::Healthcare => &[
            "health", "medical", "medicine", "medicines", "doctor", "hospital", "clinic", "checkup",
            "pharmacy", "chemist", "tablet", "capsule", "syrup", "injection", "test", "lab", "scan",
            "xray", "blood test", "diagnosis", "insurance", "health insurance", "gym", "fitness",
            "workout", "exercise", "yoga", "sports", "swimming", "dance", "pilates", "aerobics",
        ],
        CategoryLabel::Education => &[
            "education", "study", "studies", "learning", "school", "college", "university", "fees",
            "tuition", "coaching", "course", "training", "certification", "exam", "test",
            "entrance", "books", "ebook", "online class", "subscription",
        ],
        CategoryLabel::Rent => &[
            "rent", "rental", "house rent", "home rent", "flat", "apartment", "room", "pg",
            "paying guest", "hostel", "maintenance", "society charges",
        ],
        CategoryLabel::Entertainment => &[
            "entertainment", "fun", "leisure", "movie", "movies", "cinema", "theatre", "netflix",
            "prime", "hotstar", "spotify", "music", "concert", "show", "game", "games", "gaming",
            "outing", "party", "club",
        ],
        CategoryLabel::Salary => &[
            "salary", "income", "credited", "payroll", "pay slip", "bonus", "incentive", "stipend",
            "allowance", "business", "freelance",
        ],
        CategoryLabel::Income => &[],
    }
}

/// Split lowercase text into word tokens, dropping punctuation and whitespace.
pub fn word_tokens(text: &str) -> Vec<&str> {
    WORD_PATTERN.find_iter(text).map(|word| word.as_str()).collect()
}

/// Matches descriptions against the keyword table.
///
/// A keyword must equal one of the description's tokens, so "car" never matches
/// inside "card". Multi-word entries such as "credit card" can never equal a
/// single token and so never match.
#[derive(Debug, Clone)]
pub struct KeywordRuleMatcher {
    rules: Vec<(CategoryLabel, &'static [&'static str])>,
}

impl KeywordRuleMatcher {
    /// Build the matcher from the keyword table.
    pub fn new() -> Self {
        let rules = KEYWORD_ORDER
            .into_iter()
            .map(|label| (label, keywords(label)))
            .collect();

        Self { rules }
    }

    /// Find the first category, in [KEYWORD_ORDER], with a keyword in `description`.
    pub fn find_match(&self, description: &str) -> Option<CategoryLabel> {
        let lowercase = description.to_lowercase();
        let tokens: HashSet<&str> = word_tokens(&lowercase).into_iter().collect();

        if tokens.is_empty() {
            return None;
        }

        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| tokens.contains(keyword)))
            .map(|(label, _)| *label)
    }
}

impl Default for KeywordRuleMatcher {
    fn default() -> Self {
        Self::new()
    }
}
