use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// One ordering clause: a column and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub property: String,
    #[serde(default)]
    pub direction: Direction,
}

impl Order {
    pub fn asc(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: Direction::Desc,
        }
    }
}

/// Ordering for `find_all_sorted` and paged queries.
///
/// The repository passes it through untouched; only the SQL generator
/// interprets it.
///
/// # Example
///
/// ```ignore
/// let sort = Sort::by("last_name").and("first_name").and_desc("id");
/// let same: Sort = "last_name;first_name,asc;id,desc".parse()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(property: &str) -> Self {
        Self::unsorted().and(property)
    }

    pub fn by_desc(property: &str) -> Self {
        Self::unsorted().and_desc(property)
    }

    pub fn and(mut self, property: &str) -> Self {
        self.orders.push(Order::asc(property));
        self
    }

    pub fn and_desc(mut self, property: &str) -> Self {
        self.orders.push(Order::desc(property));
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }
}

impl std::str::FromStr for Sort {
    type Err = String;

    /// Parse `property[,asc|desc]` clauses separated by `;`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut orders = Vec::new();
        for clause in s.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            let mut parts = clause.splitn(2, ',').map(str::trim);
            let property = parts.next().unwrap_or_default();
            if property.is_empty() {
                return Err(format!("missing sort property in '{clause}'"));
            }
            let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
                None | Some("asc") => Direction::Asc,
                Some("desc") => Direction::Desc,
                Some(other) => return Err(format!("unknown sort direction: {other}")),
            };
            orders.push(Order {
                property: property.to_string(),
                direction,
            });
        }
        Ok(Self { orders })
    }
}

impl From<Vec<Order>> for Sort {
    fn from(orders: Vec<Order>) -> Self {
        Self { orders }
    }
}

fn default_page_size() -> u64 {
    20
}

/// Pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    /// Zero-based page index.
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub size: u64,
    #[serde(default)]
    pub sort: Sort,
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_page_size(),
            sort: Sort::unsorted(),
        }
    }
}

impl Pageable {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Sort::unsorted(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Row offset of this page, `None` when `page * size` overflows.
    pub fn offset(&self) -> Option<u64> {
        self.page.checked_mul(self.size)
    }
}

/// A page of results with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: &Pageable, total_elements: u64) -> Self {
        let total_pages = if pageable.size == 0 {
            0
        } else {
            total_elements.div_ceil(pageable.size)
        };
        Self {
            content,
            page: pageable.page,
            size: pageable.size,
            total_elements,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
