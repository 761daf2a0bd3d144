use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }
}

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const PRODUCTS: [&str; 6] = ["Bolt", "Nut", "Washer", "Bracket", "Hinge", "Spring"];
const CUSTOMERS: [&str; 8] = [
    "Acme Corp", "Globex", "Initech", "Umbrella", "Hooli", "Stark Industries", "Wayne Enterprises",
    "Tyrell",
];

/// Write one orders sheet; `with_discount` adds a column the other quarter lacks.
fn write_orders(
    ws: &mut Worksheet,
    rng: &mut SimpleRng,
    first_id: u64,
    rows: u32,
    with_discount: bool,
) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();
    let mut header = vec!["order_id", "region", "product", "units", "unit_price", "customer_note"];
    if with_discount {
        header.push("discount");
    }
    for (col, title) in header.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *title, &bold)?;
    }

    for r in 1..=rows {
        let id = first_id + u64::from(r);
        let units = rng.range(1, 250);
        let price = (rng.next_f64() * 40.0 + 0.5) * 100.0;
        ws.write_number(r, 0, id as f64)?;
        ws.write_string(r, 1, rng.pick(&REGIONS))?;
        ws.write_string(r, 2, rng.pick(&PRODUCTS))?;
        ws.write_number(r, 3, units as f64)?;
        ws.write_number(r, 4, price.round() / 100.0)?;
        // Leave some notes blank so the export shows missing values.
        if rng.next_f64() > 0.2 {
            let note = format!("{} order #{id}", rng.pick(&CUSTOMERS));
            ws.write_string(r, 5, note)?;
        }
        if with_discount {
            ws.write_number(r, 6, rng.range(0, 3) as f64 * 5.0)?;
        }
    }
    Ok(())
}

fn write_returns(ws: &mut Worksheet, rng: &mut SimpleRng, rows: u32) -> Result<(), XlsxError> {
    ws.write_string(0, 0, "order_id")?;
    ws.write_string(0, 1, "reason")?;
    for r in 1..=rows {
        ws.write_number(r, 0, rng.range(1000, 1200) as f64)?;
        ws.write_string(r, 1, rng.pick(&["damaged", "wrong item", "late"]))?;
    }
    Ok(())
}

fn main() -> Result<(), XlsxError> {
    let mut rng = SimpleRng::new(42);

    let outputs = [("sample_q1.xlsx", 1000, 60, false), ("sample_q2.xlsx", 1100, 80, true)];
    for (path, first_id, rows, with_discount) in outputs {
        let mut workbook = Workbook::new();
        let orders = workbook.add_worksheet();
        orders.set_name("Orders")?;
        write_orders(orders, &mut rng, first_id, rows, with_discount)?;

        let returns = workbook.add_worksheet();
        returns.set_name("Returns")?;
        write_returns(returns, &mut rng, rows / 10)?;

        workbook.save(path)?;
        println!("Wrote {rows} orders to {path}");
    }
    Ok(())
}
