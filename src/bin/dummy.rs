use std::sync::{Arc, Mutex};

use calendar_todo::client::Client;
use calendar_todo::notifications::{alert_channel, NotificationScanner};
use calendar_todo::search::SearchService;
use calendar_todo::store::{change_channel, TodoStore};
use calendar_todo::traits::TodoSource;
use calendar_todo::utils::{print_index, print_task};

#[tokio::main]
async fn main() {
    env_logger::init();

    let client = Client::new_from_config().unwrap();
    let (changes, mut change_feed) = change_channel();

    let store = Arc::new(Mutex::new(TodoStore::new_with_feedback_channel(client.clone(), changes)));
    store.lock().unwrap().refresh().await.unwrap();
    print_index(store.lock().unwrap().index());

    let (alerts, mut alert_feed) = alert_channel();
    let scanner = NotificationScanner::new(store.clone(), alerts).start();

    let mut search = SearchService::new(client.clone(), "2024-5-1".to_string());
    match search.search("groceries").await {
        Ok(matches) => println!("{} matches, jumping to {}", matches.len(), search.selected_date_key()),
        Err(err) => println!("{}", err),
    }

    let selected_day = client.list_by_date(search.selected_date_key()).await.unwrap();
    println!("On {}:", search.selected_date_key());
    for task in &selected_day {
        print_task(task);
    }

    tokio::select! {
        _ = change_feed.changed() => println!("{}", *change_feed.borrow()),
        Some(alert) = alert_feed.recv() => println!("Ding! {} was due {}", alert.title, alert.due),
        _ = tokio::time::sleep(std::time::Duration::from_secs(2)) => {},
    }

    scanner.stop().await;
}
