//! Demo datasets substituted when the API is unreachable.

use crate::model::{Collect, User, Volunteer};

pub struct DemoUser {
    pub username: &'static str,
    pub password: &'static str,
    pub user: User,
}

pub fn demo_users() -> Vec<DemoUser> {
    vec![DemoUser {
        username: "admin",
        password: "admin123",
        user: User {
            username: "admin".to_string(),
            firstname: "Admin".to_string(),
            lastname: "User".to_string(),
            location: Some("Paris".to_string()),
            role: None,
        },
    }]
}

pub fn demo_volunteers() -> Vec<Volunteer> {
    vec![
        Volunteer {
            id: 1,
            firstname: "Marie".to_string(),
            lastname: "Dubois".to_string(),
            username: "marie.d".to_string(),
            password: None,
            location: Some("Paris".to_string()),
            points: 120,
            created_at: Some("2025-01-15".to_string()),
        },
        Volunteer {
            id: 2,
            firstname: "Jean".to_string(),
            lastname: "Martin".to_string(),
            username: "jean.m".to_string(),
            password: None,
            location: Some("Lyon".to_string()),
            points: 98,
            created_at: Some("2025-03-02".to_string()),
        },
        Volunteer {
            id: 3,
            firstname: "Sophie".to_string(),
            lastname: "Bernard".to_string(),
            username: "sophie.b".to_string(),
            password: None,
            location: Some("Marseille".to_string()),
            points: 85,
            created_at: Some("2024-12-08".to_string()),
        },
    ]
}

pub fn demo_collects() -> Vec<Collect> {
    vec![
        Collect {
            id: 1,
            item: "Vêtements".to_string(),
            quantity: 50,
            location: Some("Paris".to_string()),
            date: Some("2023-10-01".to_string()),
        },
        Collect {
            id: 2,
            item: "Nourriture".to_string(),
            quantity: 30,
            location: Some("Lyon".to_string()),
            date: Some("2023-10-05".to_string()),
        },
        Collect {
            id: 3,
            item: "Jouets".to_string(),
            quantity: 25,
            location: Some("Marseille".to_string()),
            date: Some("2023-10-10".to_string()),
        },
    ]
}
