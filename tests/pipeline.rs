use std::io::Cursor;

use journalier::accounting::{JournalError, Summary};
use journalier::config::JournalConfig;
use journalier::data::{process_csv, DataError};

const EXPORT: &str = r#"Name,Created at,Paid at,Total,Shipping,Tax 1 Name,Tax 1 Value,Tax 2 Name,Tax 2 Value,Lineitem name
#1001,2025-10-20 18:13:20 +0200,2025-10-20 18:15:02 +0200,120.00,0.00,TVA 20%,20.00,,,Mug
#1001,2025-10-20 18:13:20 +0200,,,,,,,,Saucer
#1002,2025-10-20 09:00:00 +0200,,"10,55",0,"TVA 5,5%","0,55",,,Tea
#1003,2025-10-21 10:00:00 +0200,2025-10-22 08:00:00 +0200,126.00,6.00,TVA 20%,21.00,TVA 5.5%,0,Kettle
,,,,,,,,,Orphan line
#1004,not a date,,50.00,0,TVA 20%,8.33,,,Lost
"#;

#[test]
fn order_export_to_journal() {
    let mut out = Vec::new();
    let journal = process_csv(Cursor::new(EXPORT), &mut out, &JournalConfig::default()).expect("convert export");

    assert_eq!(
        journal.summary,
        Summary {
            orders: 4,
            undated_orders: 1,
            days: 2,
            entries: 9,
        }
    );

    let out = String::from_utf8(out).expect("utf-8 output");
    let expected = [
        "N° Compte;Journal;Date écriture;Commentaire;Montant débit;Montant crédit;N° Pièce;Date échéance;Lettrage",
        "411200000;VT2;201025;Clients;130.55;;VT2251020;;",
        "445712000;VT2;201025;TVA 20%;;20.00;VT2251020;;",
        "445710500;VT2;201025;TVA 5,5%;;0.55;VT2251020;;",
        "707000012;VT2;201025;Ventes produits finis TVA reduite;;10.00;VT2251020;;",
        "707000011;VT2;201025;Ventes marchandises TVA normale;;100.00;VT2251020;;",
        "411200000;VT2;221025;Clients;126.00;;VT2251022;;",
        "445712000;VT2;221025;TVA 20%;;21.00;VT2251022;;",
        "707000011;VT2;221025;Ventes marchandises TVA normale;;100.00;VT2251022;;",
        "708500011;VT2;221025;Ports et frais accessoires factures;;5.00;VT2251022;;",
    ];
    assert_eq!(out.lines().collect::<Vec<_>>(), expected);
    assert_eq!(out.matches("\r\n").count(), expected.len());
    assert!(out.ends_with(";;\r\n"));
}

#[test]
fn same_export_same_bytes() {
    let mut first = Vec::new();
    let mut second = Vec::new();
    process_csv(Cursor::new(EXPORT), &mut first, &JournalConfig::default()).expect("first run");
    process_csv(Cursor::new(EXPORT), &mut second, &JournalConfig::default()).expect("second run");

    assert_eq!(first, second);
}

#[test]
fn tab_separated_output() {
    let config = JournalConfig {
        output_delimiter: '\t',
        ..JournalConfig::default()
    };
    let mut out = Vec::new();
    process_csv(Cursor::new(EXPORT), &mut out, &config).expect("convert export");

    let out = String::from_utf8(out).expect("utf-8 output");
    assert_eq!(
        out.lines().nth(1),
        Some("411200000\tVT2\t201025\tClients\t130.55\t\tVT2251020\t\t")
    );
}

#[test]
fn malformed_amount_fails_the_run() {
    let input = "Name,Paid at,Total,Shipping\n#1,2025-10-20,10.00,0\n#2,2025-10-20,12.3.4,0\n";
    let mut out = Vec::new();
    let err = process_csv(Cursor::new(input), &mut out, &JournalConfig::default()).unwrap_err();

    match err {
        DataError::Journal(JournalError::InvalidAmount { line, field, value }) => {
            assert_eq!(line, 3);
            assert_eq!(field, "Total");
            assert_eq!(value, "12.3.4");
        },
        other => panic!("unexpected error: {other}"),
    }
    assert!(out.is_empty());
}

#[test]
fn export_without_order_ids_is_rejected() {
    let input = "Order,Paid at,Total,Shipping\n#1,2025-10-20,10.00,0\n";
    let err = process_csv(Cursor::new(input), Vec::new(), &JournalConfig::default()).unwrap_err();

    assert_eq!(err.to_string(), "required column `Name` is missing");
}

#[test]
fn export_without_amount_or_date_columns_is_rejected() {
    let cases = [
        (
            "Name,Paid at,Shipping,Tax 1 Name,Tax 1 Value\n#1,2025-10-20,0,TVA 20%,20.00\n",
            "required column `Total` is missing",
        ),
        ("Name,Paid at,Total\n#1,2025-10-20,10.00\n", "required column `Shipping` is missing"),
        ("Name,Total,Shipping\n#1,10.00,0\n", "required column `Paid at` or `Created at` is missing"),
    ];

    for (input, message) in cases {
        let mut out = Vec::new();
        let err = process_csv(Cursor::new(input), &mut out, &JournalConfig::default()).unwrap_err();

        assert!(matches!(err, DataError::Journal(JournalError::MissingColumn { .. })));
        assert_eq!(err.to_string(), message);
        assert!(out.is_empty());
    }
}

#[test]
fn amounts_beyond_decimal_range_fail_the_run() {
    let input = "Name,Paid at,Total,Shipping,Tax 1 Name,Tax 1 Value\n\
                 #1,2025-10-20,5000000000000000000000000000,0,TVA 5.5%,5000000000000000000000000000\n";
    let mut out = Vec::new();
    let err = process_csv(Cursor::new(input), &mut out, &JournalConfig::default()).unwrap_err();

    match err {
        DataError::Journal(JournalError::AmountOverflow { date }) => {
            assert_eq!(date.to_string(), "2025-10-20");
        },
        other => panic!("unexpected error: {other}"),
    }
    assert!(out.is_empty());
}
