use super::*;

#[test]
fn test_ref_loc() {
    let sm = SourceManager::new();
    let mut chunks = Vec::new();
    for text in ["File {\n", "#define a 1\n#if a\n", "", "", "Plot { eDensity }"] {
        let chunk = sm.add_file("sdevice_des.cmd", text);
        assert_eq!(&chunk.text[..], text);
        chunks.push(chunk);
    }
    for chunk in chunks {
        for pos in 0..(chunk.text.len() + 1) {
            let sr = SourceRef { chunk, pos };
            let sl = SourceLoc::from(sr);
            let rsr = sm.expand_loc(sl);
            assert_eq!(sr, rsr);
            assert_eq!(rsr.suffix(), &chunk.text[pos..]);
            for opos in pos..(chunk.text.len() + 1) {
                let srr = SourceRangeRef {
                    chunk,
                    pos_start: pos,
                    pos_end: opos,
                };
                assert_eq!(srr, sr.range_len(opos - pos));
                let rsrr = sm.expand_range(srr.compress());
                assert_eq!(srr, rsrr);
                assert_eq!(rsrr.start(), rsr);
                assert_eq!(rsrr.end().pos, opos);
                assert_eq!(&rsrr[..], &chunk.text[pos..opos]);
            }
        }
    }
}

#[test]
fn test_line_info() {
    let text = "abc\ndef\rghi\r\njkl\n\nmno";
    let sm = SourceManager::new();
    let chunk = sm.add_file("meh.cmd", text);
    for (i, s, e) in [
        (1, 0, 4),
        (2, 4, 8),
        (3, 8, 13),
        (4, 13, 17),
        (5, 17, 18),
        (6, 18, 21),
    ] {
        for p in s..e {
            let li = chunk.get_line_info(p);
            assert_eq!(li.chunk, chunk);
            assert_eq!(li.line_num, i);
            assert_eq!(li.line, &text[s..e]);
            assert_eq!(li.line_offset, p - s);
            let loc = SourceRef { chunk, pos: p }.compress();
            let sli = sm.get_simple_line_info(loc);
            assert_eq!(sli.file_name, "meh.cmd");
            assert_eq!(sli.line_num, i);
            assert_eq!(sli.column_num, p - s + 1);
        }
    }
    // End of text belongs to the last line.
    assert_eq!(chunk.get_line_info(text.len()).line_num, 6);
}

#[test]
fn test_chunk_identity() {
    let sm = SourceManager::new();
    let a = sm.add_file("a.cmd", "same");
    let b = sm.add_file("b.cmd", "same");
    assert_eq!(a, a);
    assert_ne!(a, b);
    assert_eq!(a.range().len(), 4);
    assert_eq!(b.start().suffix(), "same");
}

#[test]
fn test_reader() {
    let sm = SourceManager::new();
    let chunk = sm.add_file("meh.cmd", "  #define ä1\r\nrest");
    let mut reader = chunk.start().reader();
    assert_eq!(reader.peek(), Some(' '));
    assert_eq!(reader.eat_while(|c| c == ' '), "  ");
    reader.set_mark();
    assert_eq!(reader.eat(), Some('#'));
    assert_eq!(reader.eat_while(|c| c.is_ascii_alphanumeric()), "define");
    assert_eq!(&*reader.range(), "#define");
    assert_eq!(reader.mark().pos, 2);
    assert_eq!(reader.eat(), Some(' '));
    assert_eq!(reader.eat(), Some('ä'));
    assert_eq!(reader.cursor().pos, 12);
    reader.eat_while(|c| !matches!(c, '\r' | '\n'));
    assert_eq!(&*reader.range_from(chunk.start()), "  #define ä1");
    assert_eq!(reader.eat_while(|c| matches!(c, '\r' | '\n')), "\r\n");
    assert_eq!(reader.suffix(), "rest");
    reader.eat_while(|_| true);
    assert!(reader.at_end());
    assert_eq!(reader.peek(), None);
    assert_eq!(reader.eat(), None);
}
