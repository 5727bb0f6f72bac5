//! Stock field set for new templates.

use super::{Align, Color, Field, Layer, Overlay, Side};

const NAVY: Color = Color::rgb(0x1B, 0x2A, 0x4A);
const GRAY: Color = Color::rgb(0x55, 0x5B, 0x66);

pub fn front_side() -> Side {
    Side {
        background: None,
        fields: vec![
            Field::new("company", "Company", "COMPANY NAME")
                .at(50.0, 4.0)
                .size(13.0)
                .bold()
                .color(NAVY),
            Field::new("nickname", "Nickname", "JUAN")
                .at(50.0, 57.0)
                .size(26.0)
                .bold()
                .color(NAVY),
            Field::new("fullname", "Full Name", "JUAN DELA CRUZ")
                .at(50.0, 66.0)
                .size(11.0)
                .bold(),
            Field::new("position", "Position", "POSITION")
                .at(50.0, 72.0)
                .size(9.0)
                .color(GRAY),
            Field::new("idnum", "ID Number", "ID NO. 0000")
                .at(50.0, 93.0)
                .size(9.0)
                .bold(),
        ],
        photo: Layer::new(50.0, 32.0, 50.0, 30.0),
        signature: Layer::new(50.0, 83.0, 40.0, 8.0),
    }
}

pub fn back_side() -> Side {
    let mut terms = Field::new(
        "terms",
        "Terms",
        "This card is the property of the company and must be surrendered upon separation. If found, please return to the address below.",
    )
    .at(50.0, 8.0)
    .size(8.0)
    .color(GRAY);
    terms.background = Overlay {
        color: Color::WHITE,
        opacity: 0.0,
    };

    Side {
        background: None,
        fields: vec![
            terms,
            Field::new("contact_label", "Emergency Label", "IN CASE OF EMERGENCY, NOTIFY:")
                .at(50.0, 36.0)
                .size(8.0)
                .bold(),
            Field::new("contact_name", "Emergency Contact", "CONTACT NAME")
                .at(50.0, 41.0)
                .size(10.0),
            Field::new("contact_phone", "Emergency Phone", "0900 000 0000")
                .at(50.0, 46.0)
                .size(10.0),
            Field::new("fullname", "Full Name", "JUAN DELA CRUZ")
                .at(50.0, 74.0)
                .size(10.0)
                .bold(),
            Field::new("idnum", "ID Number", "ID NO. 0000")
                .at(4.0, 95.0)
                .size(8.0)
                .align(Align::Left)
                .color(GRAY),
        ],
        photo: Layer::new(50.0, 30.0, 30.0, 20.0).hidden(),
        signature: Layer::new(50.0, 66.0, 44.0, 10.0),
    }
}
