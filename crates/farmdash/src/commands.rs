//! Subcommand handlers. Each one builds the stores it needs, runs the calls and
//! prints the result.

use std::{collections::HashMap, path::PathBuf};

use anyhow::{Context, bail};
use dialoguer::{Confirm, Input, Password};
use domain::{
    Record,
    models::{
        academic_level::AcademicLevel, blog::BlogPost, consumption::Consumption, course::Course,
        customer::Customer, document::Document, email::Email, faq::Faq,
        notification::Notification, operation::Operation, product::Product, service::Service,
        staff::Staff, template::Template, transaction::Transaction,
    },
};
use services::services::{
    api_client::{ApiClient, Attachment},
    auth::AuthSession,
    cart::{Cart, CheckoutDetails},
    config::ClientConfig,
    confirm::{ConfirmGate, PendingAction},
    list_store::ListStore,
    validation::{FieldCheck, Rules},
};
use tracing::{debug, warn};
use utils::format::format_amount;

use crate::{
    cli::{Cli, Command, Resource},
    render::{self, Row},
    reporter::ConsoleReporter,
};

const SESSION_FILE: &str = "session.json";
const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

/// Run `$body` with `$T` bound to the record type of `$resource`.
macro_rules! with_record {
    ($resource:expr, $T:ident => $body:expr) => {
        match $resource {
            Resource::Products => {
                type $T = Product;
                $body
            }
            Resource::Transactions => {
                type $T = Transaction;
                $body
            }
            Resource::Customers => {
                type $T = Customer;
                $body
            }
            Resource::Staff => {
                type $T = Staff;
                $body
            }
            Resource::Operations => {
                type $T = Operation;
                $body
            }
            Resource::Consumptions => {
                type $T = Consumption;
                $body
            }
            Resource::Services => {
                type $T = Service;
                $body
            }
            Resource::Notifications => {
                type $T = Notification;
                $body
            }
            Resource::Templates => {
                type $T = Template;
                $body
            }
            Resource::Emails => {
                type $T = Email;
                $body
            }
            Resource::Blogs => {
                type $T = BlogPost;
                $body
            }
            Resource::Faqs => {
                type $T = Faq;
                $body
            }
            Resource::AcademicLevels => {
                type $T = AcademicLevel;
                $body
            }
            Resource::Courses => {
                type $T = Course;
                $body
            }
            Resource::Documents => {
                type $T = Document;
                $body
            }
        }
    };
}

struct App {
    config: ClientConfig,
    config_path: Option<PathBuf>,
    client: ApiClient,
    session: AuthSession,
    session_path: Option<PathBuf>,
    reporter: ConsoleReporter,
}

impl App {
    fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = cli.client_config()?;
        let client = ApiClient::new(&config).context("invalid API configuration")?;

        let session_path = ClientConfig::config_dir().map(|dir| dir.join(SESSION_FILE));
        let mut session = AuthSession::new(client.clone());
        if let Some(path) = &session_path {
            match session.restore(path) {
                Ok(restored) => debug!(restored, "session lookup"),
                Err(e) => warn!(error = %e, "ignoring unreadable session file"),
            }
        }

        Ok(Self {
            config,
            config_path: cli.config_path(),
            client,
            session,
            session_path,
            reporter: ConsoleReporter::new(),
        })
    }

    fn store<T: Record>(&self) -> ListStore<T> {
        ListStore::from_config(self.client.clone(), &self.config)
    }

    fn save_session(&self) -> anyhow::Result<()> {
        if let Some(path) = &self.session_path {
            self.session
                .save(path)
                .with_context(|| format!("failed to save session to {}", path.display()))?;
        }
        Ok(())
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut app = App::new(&cli)?;

    match cli.command {
        Command::Login { email, password } => login(&mut app, email, password).await,
        Command::Logout => logout(&mut app).await,
        Command::Whoami => whoami(&app),
        Command::List {
            resource,
            page,
            page_size,
        } => with_record!(resource, T => list::<T>(&app, page, page_size).await),
        Command::Show { resource, id } => with_record!(resource, T => show::<T>(&app, &id).await),
        Command::Search { resource, term } => {
            with_record!(resource, T => search::<T>(&app, &term).await)
        }
        Command::Delete { resource, id, yes } => {
            with_record!(resource, T => delete::<T>(&app, &id, yes).await)
        }
        Command::MassDelete { resource, ids, yes } => {
            with_record!(resource, T => mass_delete::<T>(&app, ids, yes).await)
        }
        Command::Suspend { id, yes } => suspend(&app, &id, yes).await,
        Command::Transactions { from, to, page } => {
            let mut store = app.store::<Transaction>();
            store.list_between(from, to, page, &app.reporter).await?;
            render::print_page(&store, page);
            println!("Outstanding on this page: {}", format_amount(store.outstanding_total()));
            Ok(())
        }
        Command::PartPayment { id, amount } => {
            let mut store = app.store::<Transaction>();
            if let Some(tx) = store.part_payment(&id, amount, &app.reporter).await? {
                println!(
                    "{}: paid {} of {}, {} outstanding",
                    tx.label(),
                    format_amount(tx.amount_paid),
                    format_amount(tx.total_amount),
                    format_amount(tx.outstanding())
                );
            }
            Ok(())
        }
        Command::AddProduct {
            name,
            price,
            stock,
            category,
            description,
            unit,
            image,
        } => {
            let mut store = app.store::<Product>();
            {
                let form = store.form_mut();
                form.name = name;
                form.price = price;
                form.quantity_in_stock = stock;
                form.category = category;
                form.description = description;
                form.unit = unit.unwrap_or_default();
                form.published = true;
            }
            add_product(&app, &mut store, image).await
        }
        Command::Checkout {
            items,
            customer_name,
            customer,
            payment,
            amount_paid,
        } => {
            let details = CheckoutDetails {
                customer,
                customer_name,
                payment_method: payment,
                amount_paid,
            };
            checkout(&app, items, details).await
        }
        Command::Preview { id, vars } => preview(&app, &id, vars.into_iter().collect()).await,
        Command::Config { save } => show_config(&app, save),
    }
}

async fn login(
    app: &mut App,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let user = app
        .session
        .login(&email, &password, &app.reporter)
        .await?
        .clone();
    app.save_session()?;
    println!("Signed in as {} ({})", user.name, user.role);
    Ok(())
}

async fn logout(app: &mut App) -> anyhow::Result<()> {
    if !app.session.is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }
    app.session.logout(&app.reporter).await;
    app.save_session()
}

fn whoami(app: &App) -> anyhow::Result<()> {
    match app.session.user() {
        Some(user) if app.session.is_authenticated() => {
            println!("{} <{}> ({})", user.name, user.email, user.role);
        }
        _ => println!("Not signed in."),
    }
    Ok(())
}

async fn list<T: Row>(app: &App, page: u64, page_size: Option<u64>) -> anyhow::Result<()> {
    let mut store = app.store::<T>();
    let page_size = page_size.unwrap_or(app.config.page_size);
    store.get_page(page, page_size, &app.reporter).await?;
    render::print_page(&store, page);
    Ok(())
}

async fn show<T: Record>(app: &App, id: &str) -> anyhow::Result<()> {
    let mut store = app.store::<T>();
    let record = store
        .get_one(&format!("{}/{}", T::RESOURCE, id), &app.reporter)
        .await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

async fn search<T: Row>(app: &App, term: &str) -> anyhow::Result<()> {
    if term.trim().is_empty() {
        bail!("search term is empty");
    }
    let mut store = app.store::<T>();
    store.search_query(term);
    store.search_settled().await;
    render::print_records(&store.searched_results());
    Ok(())
}

/// Ask before running `action`. Returns the action to run, or None when declined.
fn confirm(action: PendingAction, yes: bool) -> anyhow::Result<Option<PendingAction>> {
    let mut gate = ConfirmGate::new();
    let prompt = gate.request(action);
    if yes
        || Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?
    {
        return Ok(gate.confirm());
    }
    gate.cancel();
    println!("Cancelled.");
    Ok(None)
}

async fn delete<T: Record>(app: &App, id: &str, yes: bool) -> anyhow::Result<()> {
    let mut store = app.store::<T>();
    let record = store
        .get_one(&format!("{}/{}", T::RESOURCE, id), &ConsoleReporter::quiet())
        .await?;
    if let Some(action) = confirm(PendingAction::delete(&record), yes)? {
        store.run_confirmed(action, &app.reporter).await?;
    }
    Ok(())
}

async fn mass_delete<T: Record>(app: &App, ids: Vec<String>, yes: bool) -> anyhow::Result<()> {
    let mut store = app.store::<T>();
    if let Some(action) = confirm(PendingAction::mass_delete::<T>(ids), yes)? {
        store.run_confirmed(action, &app.reporter).await?;
    }
    Ok(())
}

async fn suspend(app: &App, id: &str, yes: bool) -> anyhow::Result<()> {
    let mut store = app.store::<Staff>();
    let staff = store
        .get_one(&format!("{}/{}", Staff::RESOURCE, id), &ConsoleReporter::quiet())
        .await?;
    if staff.suspended {
        println!("{} is already suspended.", staff.full_name());
        return Ok(());
    }
    if let Some(action) = confirm(PendingAction::suspend(&staff), yes)? {
        store.run_confirmed(action, &app.reporter).await?;
    }
    Ok(())
}

async fn add_product(
    app: &App,
    store: &mut ListStore<Product>,
    image: Option<PathBuf>,
) -> anyhow::Result<()> {
    let attachment = match &image {
        Some(path) => Some(
            Attachment::from_path(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };

    let form = store.form();
    let checks = [
        FieldCheck::new("name", "Product name", &form.name, Rules::required().max_length(100)),
        FieldCheck::new("price", "Price", form.price, Rules::required()),
        FieldCheck::new(
            "description",
            "Description",
            &form.description,
            Rules::optional().max_length(2000),
        ),
        FieldCheck::new(
            "image",
            "Image",
            attachment.as_ref(),
            Rules::optional().max_size(MAX_IMAGE_BYTES),
        ),
    ];

    let created = match attachment {
        Some(file) => {
            store
                .submit_form_with_files(&checks, vec![("image".to_string(), file)], &app.reporter)
                .await?
        }
        None => store.submit_form(&checks, &app.reporter).await?,
    };
    if let Some(product) = created {
        println!("Created {} ({})", product.name, product.id);
    }
    Ok(())
}

async fn checkout(
    app: &App,
    items: Vec<(String, u32)>,
    details: CheckoutDetails,
) -> anyhow::Result<()> {
    let mut products = app.store::<Product>();
    let mut cart = Cart::new(app.client.clone());
    let quiet = ConsoleReporter::quiet();

    for (id, quantity) in items {
        let product = products
            .get_one(&format!("{}/{}", Product::RESOURCE, id), &quiet)
            .await?;
        cart.add(&product, quantity)?;
    }
    render_cart(&cart);

    let mut transactions = app.store::<Transaction>();
    let mut notifications = app.store::<Notification>();
    let tx = cart
        .checkout(&details, &app.reporter, &mut transactions, &mut notifications)
        .await?;

    println!(
        "{}: {} charged, {} paid by {}",
        tx.label(),
        format_amount(tx.total_amount),
        format_amount(tx.amount_paid),
        tx.payment_method
    );
    for notification in notifications.results() {
        println!("🔔 {}", notification.title);
    }
    Ok(())
}

fn render_cart(cart: &Cart) {
    for line in cart.lines() {
        println!(
            "  {} × {} @ {} = {}",
            line.quantity,
            line.name,
            format_amount(line.unit_price),
            format_amount(line.total())
        );
    }
    println!("  Subtotal: {}", format_amount(cart.subtotal()));
}

async fn preview(app: &App, id: &str, vars: HashMap<String, String>) -> anyhow::Result<()> {
    let mut store = app.store::<Template>();
    let template = store
        .get_one(&format!("{}/{}", Template::RESOURCE, id), &ConsoleReporter::quiet())
        .await?;

    let missing: Vec<String> = template
        .placeholders()
        .into_iter()
        .filter(|name| !vars.contains_key(name))
        .collect();
    if !missing.is_empty() {
        warn!(missing = ?missing, "template variables left unset");
    }

    let (subject, body) = template.render(&vars);
    println!("Subject: {subject}\n\n{body}");
    Ok(())
}

fn show_config(app: &App, save: bool) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(&app.config)?);
    if save {
        let Some(path) = &app.config_path else {
            bail!("no config directory available on this system");
        };
        app.config
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}
