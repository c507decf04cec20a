//! Table output for records and the page navigation line.

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use domain::{
    Record,
    models::{
        academic_level::AcademicLevel, blog::BlogPost, consumption::Consumption, course::Course,
        customer::Customer, document::Document, email::Email, faq::Faq,
        notification::Notification, operation::Operation, product::Product, service::Service,
        staff::Staff, template::Template, transaction::Transaction,
    },
};
use services::services::list_store::ListStore;
use utils::{
    format::{format_amount, format_date, truncate},
    pagination::{page_window, render_window},
};

const TEXT_WIDTH: usize = 40;

/// Columns a record shows in a list table.
pub trait Row: Record {
    fn columns() -> Vec<&'static str> {
        vec!["Name"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.label()]
    }
}

fn date_cell(date: Option<&chrono::DateTime<chrono::Utc>>) -> String {
    date.map(format_date).unwrap_or_default()
}

impl Row for Product {
    fn columns() -> Vec<&'static str> {
        vec!["Name", "Category", "Price", "In stock", "Published"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.category.to_string(),
            format_amount(self.price),
            format!("{} {}", self.quantity_in_stock, self.unit).trim().to_string(),
            if self.published { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl Row for Transaction {
    fn columns() -> Vec<&'static str> {
        vec!["Reference", "Customer", "Total", "Paid", "Status", "Date"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.label(),
            self.customer_name.clone(),
            format_amount(self.total_amount),
            format_amount(self.amount_paid),
            self.status.to_string(),
            date_cell(self.created_at.as_ref()),
        ]
    }
}

impl Row for Customer {
    fn columns() -> Vec<&'static str> {
        vec!["Name", "Email", "Phone"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.email.clone(), self.phone.clone()]
    }
}

impl Row for Staff {
    fn columns() -> Vec<&'static str> {
        vec!["Name", "Email", "Role", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.full_name(),
            self.email.clone(),
            self.role.to_string(),
            if self.suspended { "suspended" } else { "active" }.to_string(),
        ]
    }
}

impl Row for Operation {
    fn columns() -> Vec<&'static str> {
        vec!["Title", "Kind", "Pen", "Birds", "Mortality", "Date"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.kind.to_string(),
            self.pen.clone(),
            self.bird_count.to_string(),
            self.mortality.to_string(),
            date_cell(self.date.as_ref()),
        ]
    }
}

impl Row for Consumption {
    fn columns() -> Vec<&'static str> {
        vec!["Item", "Quantity", "Cost", "Date"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.item.clone(),
            format!("{} {}", self.quantity, self.unit).trim().to_string(),
            format_amount(self.cost),
            date_cell(self.date.as_ref()),
        ]
    }
}

impl Row for Service {
    fn columns() -> Vec<&'static str> {
        vec!["Title", "Price"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.title.clone(), format_amount(self.price)]
    }
}

impl Row for Notification {
    fn columns() -> Vec<&'static str> {
        vec!["Title", "Message", "Read", "Date"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            truncate(&self.message, TEXT_WIDTH),
            if self.read { "yes" } else { "no" }.to_string(),
            date_cell(self.created_at.as_ref()),
        ]
    }
}

impl Row for Template {
    fn columns() -> Vec<&'static str> {
        vec!["Name", "Subject", "Placeholders"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            truncate(&self.subject, TEXT_WIDTH),
            self.placeholders().join(", "),
        ]
    }
}

impl Row for Email {
    fn columns() -> Vec<&'static str> {
        vec!["Subject", "Recipients", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            truncate(&self.subject, TEXT_WIDTH),
            self.recipients.len().to_string(),
            self.status.to_string(),
        ]
    }
}

impl Row for BlogPost {
    fn columns() -> Vec<&'static str> {
        vec!["Title", "Slug", "Published"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.slug.clone(),
            if self.published { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl Row for Faq {
    fn columns() -> Vec<&'static str> {
        vec!["Question"]
    }

    fn cells(&self) -> Vec<String> {
        vec![truncate(&self.question, TEXT_WIDTH * 2)]
    }
}

impl Row for AcademicLevel {}

impl Row for Course {
    fn columns() -> Vec<&'static str> {
        vec!["Title", "Price", "Weeks"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            format_amount(self.price),
            self.duration_weeks.to_string(),
        ]
    }
}

impl Row for Document {
    fn columns() -> Vec<&'static str> {
        vec!["Title", "Type", "Size"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.mime_type.clone(),
            format!("{} KB", self.size.div_ceil(1024)),
        ]
    }
}

pub fn table<T: Row>(records: &[T]) -> Table {
    let mut header = vec!["#", "Id"];
    header.extend(T::columns());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (index, record) in records.iter().enumerate() {
        let mut row = vec![(index + 1).to_string(), record.id().to_string()];
        row.extend(record.cells());
        table.add_row(row);
    }
    table
}

/// `Showing 20 of 134 · 1 2 [3] 4 … 6 7`
pub fn page_footer(count: u64, page_size: u64, shown: usize, current: u64) -> String {
    let window = render_window(&page_window(count, page_size, current), current);
    if window.is_empty() {
        format!("Showing {shown} of {count}")
    } else {
        format!("Showing {shown} of {count} · {window}")
    }
}

pub fn print_records<T: Row>(records: &[T]) {
    if records.is_empty() {
        println!("No records found.");
    } else {
        println!("{}", table(records));
    }
}

pub fn print_page<T: Row>(store: &ListStore<T>, current: u64) {
    print_records(store.results());
    println!(
        "{}",
        page_footer(
            store.count(),
            store.page_size(),
            store.results().len(),
            current
        )
    );
}
