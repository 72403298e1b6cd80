#![no_main]

use collada_geometry::router::{Router, Tag};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut router: Router<(usize, usize)> = Router::new();
    router.listen_for(
        "/a/b",
        Tag::new()
            .opened(|path, _, counts: &mut (usize, usize)| {
                assert_eq!(path.depth, 2);
                counts.0 += 1;
                assert_eq!(path.instance, counts.0);
                Ok(())
            })
            .closed(|_, counts: &mut (usize, usize)| {
                counts.1 += 1;
                Ok(())
            }),
    );

    let mut counts = (0, 0);
    if router.run(data, &mut counts).is_ok() {
        assert_eq!(counts.0, counts.1);
        assert_eq!(router.depth(), 0);
    }
});
