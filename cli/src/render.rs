//! Plain-text tables and detail views.

use std::fmt::Write;

use shopstream_admin::models::{AdminProfile, Shop, User};
use shopstream_admin::pages::Control;
use shopstream_admin::pages::dashboard::DashboardStats;
use shopstream_admin::pages::shops::ShopStats;
use shopstream_admin::pages::streamers::StreamerStats;
use shopstream_admin::pages::users::UserStats;

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("N/A")
}

fn table(out: &mut String, header: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(out, "{}", line(header.to_vec()));
    for row in rows {
        let _ = writeln!(out, "{}", line(row.iter().map(String::as_str).collect()));
    }
    if rows.is_empty() {
        let _ = writeln!(out, "(no matching records)");
    }
}

pub fn profile(user: &AdminProfile) -> String {
    let name = match (&user.firstname, &user.lastname) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        _ => or_na(user.username.as_deref()).to_string(),
    };
    format!("{name} <{}> role={}", user.email, or_na(user.role.as_deref()))
}

pub fn dashboard(stats: &DashboardStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total users         {}", stats.total_users);
    let _ = writeln!(out, "Total streamers     {}", stats.total_streamers);
    let _ = writeln!(out, "  verified          {}", stats.verified_streamers);
    let _ = writeln!(out, "  pending           {}", stats.pending_streamers);
    let _ = writeln!(out, "Total shops         {}", stats.total_shops);
    let _ = writeln!(out, "  active            {}", stats.active_shops);
    out
}

pub fn users(rows: &[&User], stats: &UserStats) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "streamers: {}  regular: {}  verified: {}\n",
        stats.streamers, stats.regular, stats.verified
    );
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|u| {
            vec![
                u.id.clone(),
                u.display_name(),
                u.email.clone(),
                u.role_label().to_string(),
                yes_no(u.is_verified).to_string(),
                u.shop.as_deref().map_or_else(|| "N/A".to_string(), |s| s.display_name().to_string()),
                or_na(u.joined_on()).to_string(),
            ]
        })
        .collect();
    table(&mut out, &["ID", "NAME", "EMAIL", "ROLE", "VERIFIED", "SHOP", "JOINED"], &rows);
    out
}

pub fn user_detail(user: &User, promotion: Control) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", user.display_name(), user.id);
    let _ = writeln!(out, "  email     {}", user.email);
    let _ = writeln!(out, "  username  {}", or_na(user.username.as_deref()));
    let _ = writeln!(out, "  phone     {}", or_na(user.phone_number.as_deref()));
    let _ = writeln!(out, "  role      {}", user.role_label());
    let _ = writeln!(out, "  verified  {}", yes_no(user.is_verified));
    let _ = writeln!(out, "  followers {}  following {}", user.followers.len(), user.following.len());
    if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
        let _ = writeln!(out, "  bio       {bio}");
    }
    match user.shop.as_deref() {
        Some(shop) => {
            let state = if shop.is_active { "active" } else { "pending activation" };
            let _ = writeln!(out, "  shop      {} ({state})", shop.display_name());
        }
        None => {
            let _ = writeln!(out, "  shop      none");
        }
    }
    if user.is_streamer {
        let _ = writeln!(out, "  action    `users demote {}`", user.id);
    } else {
        match promotion {
            Control::Enabled => {
                let _ = writeln!(out, "  action    `users promote {}`", user.id);
            }
            Control::Disabled { reason } => {
                let _ = writeln!(out, "  action    promotion unavailable: {reason}");
            }
        }
    }
    out
}

pub fn streamers(rows: &[&User], stats: &StreamerStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "total: {}  verified: {}  pending: {}\n", stats.total, stats.verified, stats.pending);
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|u| {
            vec![
                u.id.clone(),
                u.display_name(),
                u.email.clone(),
                (if u.is_verified { "Verified" } else { "Pending" }).to_string(),
                u.followers.len().to_string(),
            ]
        })
        .collect();
    table(&mut out, &["ID", "NAME", "EMAIL", "STATUS", "FOLLOWERS"], &rows);
    out
}

pub fn streamer_detail(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", user.display_name(), user.id);
    let _ = writeln!(out, "  email     {}", user.email);
    let _ = writeln!(out, "  phone     {}", or_na(user.phone_number.as_deref()));
    let _ = writeln!(out, "  status    {}", if user.is_verified { "Verified" } else { "Pending" });
    let _ = writeln!(out, "  followers {}", user.followers.len());
    let _ = writeln!(out, "  joined    {}", or_na(user.joined_on()));
    out
}

pub fn shops(rows: &[&Shop], stats: &ShopStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "active: {}  inactive: {}\n", stats.active, stats.inactive);
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.display_name().to_string(),
                s.owner_label(),
                s.email.clone(),
                (if s.is_active { "Active" } else { "Inactive" }).to_string(),
            ]
        })
        .collect();
    table(&mut out, &["ID", "NAME", "OWNER", "EMAIL", "STATUS"], &rows);
    out
}

pub fn shop_detail(shop: &Shop) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", shop.display_name(), shop.id);
    let _ = writeln!(out, "  owner     {}", shop.owner_label());
    let _ = writeln!(out, "  email     {}", shop.email);
    let _ = writeln!(out, "  phone     {}", shop.phone);
    let _ = writeln!(out, "  address   {}", shop.address);
    let _ = writeln!(out, "  ifu       {}", shop.ifu);
    let _ = writeln!(out, "  website   {}", or_na(shop.website.as_deref()));
    let _ = writeln!(out, "  status    {}", if shop.is_active { "Active" } else { "Inactive" });
    out
}
