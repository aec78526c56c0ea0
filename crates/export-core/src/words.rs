//! Vietnamese reading of invoice amounts (`Số tiền viết bằng chữ`)

const DIGITS: [&str; 10] = [
    "không", "một", "hai", "ba", "bốn", "năm", "sáu", "bảy", "tám", "chín",
];

/// `45_000_000` reads "Bốn mươi lăm triệu đồng chẵn"
pub fn amount_in_words(amount: i64) -> String {
    let mut words = number_in_words(amount.unsigned_abs());
    if amount < 0 {
        words = format!("âm {words}");
    }
    format!("{} đồng chẵn", capitalize(&words))
}

pub fn number_in_words(n: u64) -> String {
    if n == 0 {
        return DIGITS[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = n;
    while rest > 0 {
        groups.push((rest % 1000) as usize);
        rest /= 1000;
    }

    let top = groups.len() - 1;
    let mut words: Vec<&str> = Vec::new();
    for i in (0..groups.len()).rev() {
        if groups[i] > 0 {
            // every group below the leading one is read with its hundreds
            read_group(groups[i], i != top, &mut words);
            if let Some(unit) = scale(i) {
                words.push(unit);
            }
        } else if i > 0 && i % 3 == 0 && groups[i + 1..].iter().take(2).any(|&g| g > 0) {
            words.push("tỷ");
        }
    }
    words.join(" ")
}

/// Unit after the three-digit group at `index` (0 = units)
fn scale(index: usize) -> Option<&'static str> {
    match (index, index % 3) {
        (0, _) => None,
        (_, 1) => Some("nghìn"),
        (_, 2) => Some("triệu"),
        _ => Some("tỷ"),
    }
}

fn read_group(group: usize, full: bool, words: &mut Vec<&'static str>) {
    let (hundreds, tens, ones) = (group / 100, group / 10 % 10, group % 10);

    if hundreds > 0 || full {
        words.push(DIGITS[hundreds]);
        words.push("trăm");
    }

    match tens {
        0 => {
            if ones > 0 {
                if hundreds > 0 || full {
                    words.push("linh");
                }
                words.push(DIGITS[ones]);
            }
        }
        1 => {
            words.push("mười");
            match ones {
                0 => {}
                5 => words.push("lăm"),
                d => words.push(DIGITS[d]),
            }
        }
        t => {
            words.push(DIGITS[t]);
            words.push("mươi");
            match ones {
                0 => {}
                1 => words.push("mốt"),
                5 => words.push("lăm"),
                d => words.push(DIGITS[d]),
            }
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
