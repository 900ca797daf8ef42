use crate::srs::Decision;

///Columns a press has to travel before its release counts as a decision.
pub(super) const SWIPE_THRESHOLD: u16 = 8;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) enum SwipeOutcome {
    Commit(Decision),
    Click,
    Cancel,
}

///Tracks one horizontal drag from press to release.
#[derive(Default)]
pub(super) struct Swipe {
    start: Option<u16>,
}

impl Swipe {
    pub fn press(&mut self, column: u16) {
        self.start = Some(column);
    }

    ///`None` when there was no matching press.
    pub fn release(&mut self, column: u16) -> Option<SwipeOutcome> {
        self.start
            .take()
            .map(|start| classify(column as i32 - start as i32))
    }
}

///Right commits `Learned`, left commits `Review`. No movement is a click;
///anything short of the threshold is a cancel.
pub(super) fn classify(displacement: i32) -> SwipeOutcome {
    let threshold = SWIPE_THRESHOLD as i32;
    match displacement {
        0 => SwipeOutcome::Click,
        d if d > threshold => SwipeOutcome::Commit(Decision::Learned),
        d if d < -threshold => SwipeOutcome::Commit(Decision::Review),
        _ => SwipeOutcome::Cancel,
    }
}
