// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caseboard-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caseboard and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Sample boards for the `--demo` flag, tests and benchmarks.

use super::board::Board;
use super::connection::Connection;
use super::geometry::{Point, Size};
use super::ids::{ConnectionId, NodeId};
use super::node::{Node, NodeData, NodeKind};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn cid(value: &str) -> ConnectionId {
    ConnectionId::new(value).expect("connection id")
}

fn card(id: &str, kind: NodeKind, x: f64, y: f64, data: NodeData) -> Node {
    Node::new(nid(id), kind, Point::new(x, y), Size::new(200.0, 150.0), data)
}

/// A small investigation: two people, a place they share and a source link.
pub fn investigation_small() -> Board {
    let mut suspect = NodeData::titled("J. Doe");
    suspect.aliases = Some("jd, johnny".to_owned());
    suspect.description = Some("Registered the domain".to_owned());

    let mut contact = NodeData::titled("A. Smith");
    contact.aliases = Some(String::new());
    contact.description = Some("Shares the office address".to_owned());

    let mut office = NodeData::titled("Office");
    office.location = Some("12 Harbour St".to_owned());

    let mut whois = NodeData::titled("WHOIS record");
    whois.url = Some("https://example.org/whois".to_owned());

    let mut notes = NodeData::titled("Open questions");
    notes.content = Some("Who paid for the lease?".to_owned());

    let nodes = vec![
        card("n:suspect", NodeKind::Person, 400.0, 300.0, suspect),
        card("n:contact", NodeKind::Person, 900.0, 300.0, contact),
        card("n:office", NodeKind::Location, 650.0, 700.0, office),
        card("n:whois", NodeKind::Link, 150.0, 700.0, whois),
        card("n:notes", NodeKind::Note, 1150.0, 700.0, notes),
    ];
    let connections = vec![
        Connection::new(cid("c:suspect-contact"), nid("n:suspect"), nid("n:contact"))
            .with_label("met"),
        Connection::new(cid("c:suspect-office"), nid("n:suspect"), nid("n:office")),
        Connection::new(cid("c:contact-office"), nid("n:contact"), nid("n:office")),
        Connection::new(cid("c:whois-suspect"), nid("n:whois"), nid("n:suspect"))
            .with_label("registrant"),
    ];

    Board::from_parts(nodes, connections)
}

/// `count` note cards in a row, each connected to the next.
pub fn chain_of(count: usize) -> Board {
    let nodes = (0..count)
        .map(|idx| {
            card(
                &format!("n:{idx}"),
                NodeKind::Note,
                100.0 + (idx as f64) * 250.0,
                100.0,
                NodeData::titled(format!("Card {idx}")),
            )
        })
        .collect::<Vec<_>>();
    let connections = (1..count)
        .map(|idx| {
            Connection::new(
                cid(&format!("c:{idx}")),
                nid(&format!("n:{}", idx - 1)),
                nid(&format!("n:{idx}")),
            )
        })
        .collect::<Vec<_>>();
    Board::from_parts(nodes, connections)
}
